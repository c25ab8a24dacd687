use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common dataframe dtypes.
/// Used as a key in `BTreeMap` / `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            CellValue::Null => write!(f, "NaN"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` for statistics and plotting.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if v.is_finite() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Column types
// ---------------------------------------------------------------------------

/// Inferred storage type of a column, labelled like dataframe dtypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Int64,
    Float64,
    Bool,
    Object,
}

/// The two roles a column can play in the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl ColumnType {
    pub fn label(self) -> &'static str {
        match self {
            ColumnType::Int64 => "int64",
            ColumnType::Float64 => "float64",
            ColumnType::Bool => "bool",
            ColumnType::Object => "object",
        }
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            ColumnType::Int64 | ColumnType::Float64 => ColumnKind::Numeric,
            ColumnType::Bool | ColumnType::Object => ColumnKind::Categorical,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Column – one named, typed column of the table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub dtype: ColumnType,
    /// One cell per row.
    pub cells: Vec<CellValue>,
}

impl Column {
    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_null()).count()
    }

    pub fn is_numeric(&self) -> bool {
        self.dtype.kind() == ColumnKind::Numeric
    }

    /// Row-aligned numeric view; `None` marks a missing or non-finite cell.
    pub fn numeric_values(&self) -> Vec<Option<f64>> {
        self.cells.iter().map(CellValue::as_f64).collect()
    }

    /// Present, finite numeric values in row order.
    pub fn present_values(&self) -> Vec<f64> {
        self.cells.iter().filter_map(CellValue::as_f64).collect()
    }
}

// ---------------------------------------------------------------------------
// ColumnPartition – numeric vs categorical split
// ---------------------------------------------------------------------------

/// Column names split by role, each list in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnPartition {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The parsed table. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Dataset {
    /// Build a dataset from columns that all hold `n_rows` cells.
    pub fn new(columns: Vec<Column>, n_rows: usize) -> Self {
        debug_assert!(columns.iter().all(|c| c.cells.len() == n_rows));
        Dataset { columns, n_rows }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Total number of missing cells across the whole table.
    pub fn missing_count(&self) -> usize {
        self.columns.iter().map(Column::missing_count).sum()
    }

    pub fn partition(&self) -> ColumnPartition {
        let mut partition = ColumnPartition::default();
        for col in &self.columns {
            match col.dtype.kind() {
                ColumnKind::Numeric => partition.numeric.push(col.name.clone()),
                ColumnKind::Categorical => partition.categorical.push(col.name.clone()),
            }
        }
        partition
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_numeric())
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.columns.get(col)?.cells.get(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new(
            vec![
                Column {
                    name: "n".into(),
                    dtype: ColumnType::Float64,
                    cells: vec![CellValue::Float(1.5), CellValue::Null, CellValue::Float(3.0)],
                },
                Column {
                    name: "flag".into(),
                    dtype: ColumnType::Bool,
                    cells: vec![
                        CellValue::Bool(true),
                        CellValue::Bool(false),
                        CellValue::Bool(true),
                    ],
                },
                Column {
                    name: "s".into(),
                    dtype: ColumnType::Object,
                    cells: vec![CellValue::Null, CellValue::Text("a".into()), CellValue::Null],
                },
            ],
            3,
        )
    }

    #[test]
    fn partition_is_complete_and_disjoint() {
        let ds = sample();
        let p = ds.partition();
        assert_eq!(p.numeric, vec!["n"]);
        assert_eq!(p.categorical, vec!["flag", "s"]);
        assert_eq!(p.numeric.len() + p.categorical.len(), ds.n_columns());
        assert!(p.numeric.iter().all(|n| !p.categorical.contains(n)));
    }

    #[test]
    fn missing_count_sums_all_null_cells() {
        assert_eq!(sample().missing_count(), 3);
    }

    #[test]
    fn numeric_values_stay_row_aligned() {
        let ds = sample();
        let col = ds.column("n").unwrap();
        assert_eq!(col.numeric_values(), vec![Some(1.5), None, Some(3.0)]);
        assert_eq!(col.present_values(), vec![1.5, 3.0]);
    }

    #[test]
    fn cell_values_order_by_type_then_value() {
        let mut values = vec![
            CellValue::Text("b".into()),
            CellValue::Integer(2),
            CellValue::Null,
            CellValue::Text("a".into()),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                CellValue::Null,
                CellValue::Integer(2),
                CellValue::Text("a".into()),
                CellValue::Text("b".into()),
            ]
        );
    }
}
