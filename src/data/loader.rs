use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;

use super::model::{CellValue, Column, ColumnType, Dataset};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why an upload could not be turned into a [`Dataset`].
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("the upload carried no file content")]
    NoContent,
    #[error("file looks like binary data (NUL byte at offset {offset})")]
    Binary { offset: usize },
    #[error("file is not valid UTF-8 text (invalid byte at offset {offset})")]
    Encoding { offset: usize },
    #[error("no columns to parse from file")]
    Empty,
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: expected {expected} fields, saw {found}")]
    TooManyFields {
        line: u64,
        expected: usize,
        found: usize,
    },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read and parse a CSV file from disk.
pub fn load_file(path: &Path) -> Result<Dataset, IngestError> {
    let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_csv_bytes(&bytes)
}

/// Parse a file dropped onto the window. Native drops carry a path, web
/// drops carry the bytes.
pub fn load_dropped(bytes: Option<&[u8]>, path: Option<&Path>) -> Result<Dataset, IngestError> {
    match (bytes, path) {
        (Some(bytes), _) => parse_csv_bytes(bytes),
        (None, Some(path)) => load_file(path),
        (None, None) => Err(IngestError::NoContent),
    }
}

/// Parse comma-separated text with a header row.
///
/// * A leading UTF-8 BOM is skipped, blank lines are ignored.
/// * Rows shorter than the header are padded with missing cells; longer
///   rows are rejected.
/// * Column types are inferred afterwards, see [`infer_column`].
pub fn parse_csv_bytes(bytes: &[u8]) -> Result<Dataset, IngestError> {
    if let Some(offset) = bytes.iter().position(|&b| b == 0) {
        return Err(IngestError::Binary { offset });
    }
    let text = std::str::from_utf8(bytes).map_err(|e| IngestError::Encoding {
        offset: e.valid_up_to(),
    })?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let raw_headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if raw_headers.iter().all(|h| h.trim().is_empty()) && raw_headers.len() <= 1 {
        return Err(IngestError::Empty);
    }
    let headers = normalize_headers(&raw_headers);

    let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    let mut n_rows = 0;

    for result in reader.records() {
        let record = result?;
        if record.len() > headers.len() {
            return Err(IngestError::TooManyFields {
                line: record.position().map_or(n_rows as u64 + 2, |p| p.line()),
                expected: headers.len(),
                found: record.len(),
            });
        }
        for (idx, raw) in raw_columns.iter_mut().enumerate() {
            raw.push(record.get(idx).unwrap_or("").to_string());
        }
        n_rows += 1;
    }

    let columns = headers
        .into_iter()
        .zip(raw_columns)
        .map(|(name, raw)| infer_column(name, raw))
        .collect();

    Ok(Dataset::new(columns, n_rows))
}

// ---------------------------------------------------------------------------
// Header normalisation
// ---------------------------------------------------------------------------

/// Blank names become `Unnamed: {i}`, repeats get `.1`, `.2`, … suffixes.
fn normalize_headers(raw: &[String]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(raw.len());

    for (idx, header) in raw.iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            header.clone()
        };
        let mut name = base.clone();
        let mut suffix = 0;
        while used.contains(&name) {
            suffix += 1;
            name = format!("{base}.{suffix}");
        }
        used.insert(name.clone());
        names.push(name);
    }
    names
}

// ---------------------------------------------------------------------------
// Type inference
// ---------------------------------------------------------------------------

/// Cell contents treated as missing.
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing(s: &str) -> bool {
    MISSING_MARKERS.contains(&s)
}

fn parse_int(s: &str) -> Option<i64> {
    s.trim().parse::<i64>().ok()
}

fn parse_float(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Decide a column's dtype from its raw text and convert the cells.
///
/// Integer columns with gaps are widened to `float64`, boolean columns with
/// gaps fall back to `object`, a column with rows but no values at all is
/// `float64`, and a header-only column is `object`.
fn infer_column(name: String, raw: Vec<String>) -> Column {
    let present: Vec<&str> = raw
        .iter()
        .map(String::as_str)
        .filter(|s| !is_missing(s))
        .collect();
    let has_missing = present.len() < raw.len();

    let dtype = if raw.is_empty() {
        ColumnType::Object
    } else if present.is_empty() {
        ColumnType::Float64
    } else if present.iter().all(|s| parse_int(s).is_some()) {
        if has_missing {
            ColumnType::Float64
        } else {
            ColumnType::Int64
        }
    } else if present.iter().all(|s| parse_float(s).is_some()) {
        ColumnType::Float64
    } else if !has_missing && present.iter().all(|s| parse_bool(s).is_some()) {
        ColumnType::Bool
    } else {
        ColumnType::Object
    };

    let cells = raw.into_iter().map(|s| to_cell(s, dtype)).collect();
    Column { name, dtype, cells }
}

fn to_cell(s: String, dtype: ColumnType) -> CellValue {
    if is_missing(&s) {
        return CellValue::Null;
    }
    let parsed = match dtype {
        ColumnType::Int64 => parse_int(&s).map(CellValue::Integer),
        ColumnType::Float64 => parse_float(&s).map(CellValue::Float),
        ColumnType::Bool => parse_bool(&s).map(CellValue::Bool),
        ColumnType::Object => return CellValue::Text(s),
    };
    parsed.unwrap_or(CellValue::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ColumnKind;

    fn parse(text: &str) -> Dataset {
        parse_csv_bytes(text.as_bytes()).unwrap()
    }

    #[test]
    fn age_city_table_has_expected_shape() {
        let ds = parse("age,city\n30,Paris\n,Lyon\n25,Paris\n41,Nice\n35,Lyon\n");
        assert_eq!(ds.n_rows(), 5);
        assert_eq!(ds.n_columns(), 2);
        assert_eq!(ds.missing_count(), 1);

        let age = ds.column("age").unwrap();
        assert_eq!(age.dtype, ColumnType::Float64);
        assert_eq!(age.dtype.kind(), ColumnKind::Numeric);
        assert_eq!(ds.column("city").unwrap().dtype, ColumnType::Object);
    }

    #[test]
    fn infers_each_dtype() {
        let ds = parse(
            "i,f,b,s,mixed\n\
             1,1.5,true,x,1\n\
             2,2,False,y,two\n\
             3,-0.25,TRUE,z,3\n",
        );
        let dtypes: Vec<_> = ds.columns().iter().map(|c| c.dtype).collect();
        assert_eq!(
            dtypes,
            vec![
                ColumnType::Int64,
                ColumnType::Float64,
                ColumnType::Bool,
                ColumnType::Object,
                ColumnType::Object,
            ]
        );
        assert_eq!(ds.cell(1, 4), Some(&CellValue::Text("two".into())));
        assert_eq!(ds.cell(2, 0), Some(&CellValue::Integer(3)));
    }

    #[test]
    fn missing_markers_count_as_missing() {
        let ds = parse("a,b\nNA,x\nnull,\n3,N/A\n");
        assert_eq!(ds.missing_count(), 4);
        assert_eq!(ds.column("a").unwrap().dtype, ColumnType::Float64);
        assert_eq!(ds.column("b").unwrap().cells[0], CellValue::Text("x".into()));
    }

    #[test]
    fn all_missing_column_is_numeric() {
        let ds = parse("a,b\n,1\n,2\n");
        let a = ds.column("a").unwrap();
        assert_eq!(a.dtype, ColumnType::Float64);
        assert_eq!(a.missing_count(), 2);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let ds = parse("flag\ntrue\n\nfalse\n");
        assert_eq!(ds.n_rows(), 2);
        assert_eq!(ds.column("flag").unwrap().dtype, ColumnType::Bool);
    }

    #[test]
    fn bool_with_gap_becomes_object() {
        let ds = parse("flag,n\ntrue,1\n,2\nfalse,3\n");
        assert_eq!(ds.column("flag").unwrap().dtype, ColumnType::Object);
    }

    #[test]
    fn header_only_file_has_zero_rows() {
        let ds = parse("a,b,c\n");
        assert_eq!(ds.n_rows(), 0);
        assert_eq!(ds.n_columns(), 3);
        assert_eq!(ds.missing_count(), 0);
        assert!(ds.partition().numeric.is_empty());
    }

    #[test]
    fn short_rows_are_padded() {
        let ds = parse("a,b,c\n1,2\n4,5,6\n");
        assert_eq!(ds.n_rows(), 2);
        assert_eq!(ds.cell(0, 2), Some(&CellValue::Null));
        assert_eq!(ds.column("c").unwrap().dtype, ColumnType::Float64);
    }

    #[test]
    fn long_rows_are_rejected() {
        let err = parse_csv_bytes(b"a,b\n1,2\n3,4,5\n").unwrap_err();
        match err {
            IngestError::TooManyFields {
                line,
                expected,
                found,
            } => {
                assert_eq!(line, 3);
                assert_eq!(expected, 2);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn headers_are_deduplicated_and_named() {
        let ds = parse("a,,a,a\n1,2,3,4\n");
        assert_eq!(ds.column_names(), vec!["a", "Unnamed: 1", "a.1", "a.2"]);
    }

    #[test]
    fn bom_is_skipped() {
        let ds = parse_csv_bytes("\u{feff}x,y\n1,2\n".as_bytes()).unwrap();
        assert_eq!(ds.column_names(), vec!["x", "y"]);
    }

    #[test]
    fn binary_input_is_rejected() {
        let bytes = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00];
        assert!(matches!(
            parse_csv_bytes(&bytes),
            Err(IngestError::Binary { offset: 8 })
        ));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let bytes = b"a,b\n1,\xff\xfe\n";
        assert!(matches!(
            parse_csv_bytes(bytes),
            Err(IngestError::Encoding { offset: 6 })
        ));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(parse_csv_bytes(b""), Err(IngestError::Empty)));
        assert!(matches!(parse_csv_bytes(b"\n\n"), Err(IngestError::Empty)));
    }

    #[test]
    fn dropped_upload_without_content_is_rejected() {
        assert!(matches!(load_dropped(None, None), Err(IngestError::NoContent)));
        let ds = load_dropped(Some(b"a\n1\n".as_slice()), None).unwrap();
        assert_eq!(ds.n_rows(), 1);
    }

    #[test]
    fn load_file_reads_from_disk() {
        let path = std::env::temp_dir().join(format!(
            "dataset-analyzer-loader-{}.csv",
            std::process::id()
        ));
        std::fs::write(&path, "k,v\na,1\nb,2\n").unwrap();
        let ds = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(ds.n_rows(), 2);

        let missing = path.with_extension("nope");
        assert!(matches!(load_file(&missing), Err(IngestError::Io { .. })));
    }
}
