use std::collections::HashMap;
use std::f64::consts::TAU;

use super::model::{CellValue, ColumnKind, Dataset};
use super::stats::{self, BoxSummary, CorrelationMatrix, HistogramBin};

// ---------------------------------------------------------------------------
// Panel outcome
// ---------------------------------------------------------------------------

/// What a chart panel shows: a chart model, or a notice explaining why the
/// chart cannot be drawn for this table.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel<T> {
    Ready(T),
    Unavailable(String),
}

impl<T> Panel<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            Panel::Ready(chart) => Some(chart),
            Panel::Unavailable(_) => None,
        }
    }
}

/// The selected column if it is still a valid option, else the first option.
pub fn resolve_column<'a>(selected: Option<&'a str>, options: &'a [String]) -> Option<&'a str> {
    selected
        .filter(|s| options.iter().any(|o| o == s))
        .or_else(|| options.first().map(String::as_str))
}

fn present_values(dataset: &Dataset, column: &str) -> Vec<f64> {
    dataset
        .column(column)
        .map(|c| c.present_values())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramChart {
    pub column: String,
    pub bins: Vec<HistogramBin>,
}

pub fn histogram_panel(
    dataset: &Dataset,
    selected: Option<&str>,
    bins: usize,
) -> Panel<HistogramChart> {
    let partition = dataset.partition();
    let Some(column) = resolve_column(selected, &partition.numeric) else {
        return Panel::Unavailable("No numeric columns available for histogram.".into());
    };
    let values = present_values(dataset, column);
    if values.is_empty() {
        return Panel::Unavailable(format!("Column '{column}' has no values to plot."));
    }
    Panel::Ready(HistogramChart {
        column: column.to_string(),
        bins: stats::histogram(&values, bins),
    })
}

// ---------------------------------------------------------------------------
// Box plot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct BoxChart {
    pub column: String,
    pub summary: BoxSummary,
}

pub fn box_panel(dataset: &Dataset, selected: Option<&str>) -> Panel<BoxChart> {
    let partition = dataset.partition();
    let Some(column) = resolve_column(selected, &partition.numeric) else {
        return Panel::Unavailable("No numeric columns available for box plot.".into());
    };
    match stats::box_summary(&present_values(dataset, column)) {
        Some(summary) => Panel::Ready(BoxChart {
            column: column.to_string(),
            summary,
        }),
        None => Panel::Unavailable(format!("Column '{column}' has no values to plot.")),
    }
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

pub fn correlation_panel(dataset: &Dataset) -> Panel<CorrelationMatrix> {
    match stats::correlation(dataset) {
        Some(matrix) => Panel::Ready(matrix),
        None => Panel::Unavailable(
            "Correlation heatmap needs at least two numeric columns.".into(),
        ),
    }
}

// ---------------------------------------------------------------------------
// Scatter plot
// ---------------------------------------------------------------------------

/// Points sharing one value of the colour column. `value` is `None` for an
/// ungrouped plot.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterGroup {
    pub value: Option<CellValue>,
    pub points: Vec<[f64; 2]>,
}

impl ScatterGroup {
    pub fn label(&self) -> String {
        match &self.value {
            None => "points".to_string(),
            Some(CellValue::Null) => "(missing)".to_string(),
            Some(v) => v.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterChart {
    pub x: String,
    pub y: String,
    pub color: Option<String>,
    pub groups: Vec<ScatterGroup>,
}

/// Rows missing either coordinate are skipped. Groups follow the order in
/// which their value first appears. A colour column that is not categorical
/// is ignored.
pub fn scatter_panel(
    dataset: &Dataset,
    x: Option<&str>,
    y: Option<&str>,
    color: Option<&str>,
) -> Panel<ScatterChart> {
    let partition = dataset.partition();
    let (Some(x), Some(y)) = (
        resolve_column(x, &partition.numeric),
        resolve_column(y, &partition.numeric),
    ) else {
        return Panel::Unavailable("No numeric columns available for scatter plot.".into());
    };
    let (Some(x_col), Some(y_col)) = (dataset.column(x), dataset.column(y)) else {
        return Panel::Unavailable("Selected columns are not in the dataset.".into());
    };
    let color_col = color
        .and_then(|name| dataset.column(name))
        .filter(|c| c.dtype.kind() == ColumnKind::Categorical);

    let coords: Vec<Option<[f64; 2]>> = x_col
        .numeric_values()
        .into_iter()
        .zip(y_col.numeric_values())
        .map(|(xv, yv)| Some([xv?, yv?]))
        .collect();

    let groups = match color_col {
        Some(col) => {
            let mut groups: Vec<ScatterGroup> = Vec::new();
            let mut index: HashMap<&CellValue, usize> = HashMap::new();
            for (point, cell) in coords.iter().zip(&col.cells) {
                let Some(p) = point else {
                    continue;
                };
                let slot = *index.entry(cell).or_insert_with(|| {
                    groups.push(ScatterGroup {
                        value: Some(cell.clone()),
                        points: Vec::new(),
                    });
                    groups.len() - 1
                });
                groups[slot].points.push(*p);
            }
            groups
        }
        None => vec![ScatterGroup {
            value: None,
            points: coords.into_iter().flatten().collect(),
        }],
    };

    Panel::Ready(ScatterChart {
        x: x.to_string(),
        y: y.to_string(),
        color: color_col.map(|c| c.name.clone()),
        groups,
    })
}

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

/// One slice; angles are in turns, clockwise from 12 o'clock.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
    pub fraction: f64,
    pub start_turn: f64,
    pub end_turn: f64,
}

impl PieSlice {
    /// Closed outline of the slice on the unit circle, starting at the centre.
    pub fn outline(&self, segments_per_turn: usize) -> Vec<[f64; 2]> {
        let span = self.end_turn - self.start_turn;
        let segments = ((span * segments_per_turn as f64).ceil() as usize).max(2);
        let mut points = Vec::with_capacity(segments + 2);
        points.push([0.0, 0.0]);
        for i in 0..=segments {
            let turn = self.start_turn + span * i as f64 / segments as f64;
            let angle = turn * TAU;
            points.push([angle.sin(), angle.cos()]);
        }
        points
    }

    /// Point halfway along the slice at `radius`, for labels.
    pub fn label_anchor(&self, radius: f64) -> [f64; 2] {
        let angle = (self.start_turn + self.end_turn) / 2.0 * TAU;
        [radius * angle.sin(), radius * angle.cos()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub column: String,
    pub total: usize,
    pub slices: Vec<PieSlice>,
}

pub fn pie_panel(dataset: &Dataset, selected: Option<&str>) -> Panel<PieChart> {
    let partition = dataset.partition();
    let Some(column) = resolve_column(selected, &partition.categorical) else {
        return Panel::Unavailable("No categorical columns available for pie chart.".into());
    };
    let Some(col) = dataset.column(column) else {
        return Panel::Unavailable(format!("Column '{column}' is not in the dataset."));
    };
    let counts = stats::value_counts(col);
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    if total == 0 {
        return Panel::Unavailable(format!("Column '{column}' has no values to plot."));
    }

    let mut turn = 0.0;
    let slices = counts
        .into_iter()
        .map(|(label, count)| {
            let fraction = count as f64 / total as f64;
            let slice = PieSlice {
                label,
                count,
                fraction,
                start_turn: turn,
                end_turn: turn + fraction,
            };
            turn += fraction;
            slice
        })
        .collect();

    Panel::Ready(PieChart {
        column: column.to_string(),
        total,
        slices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv_bytes;

    fn age_city() -> Dataset {
        parse_csv_bytes(b"age,city\n30,Paris\n,Lyon\n25,Paris\n41,Nice\n35,Lyon\n").unwrap()
    }

    #[test]
    fn age_city_panels_offer_the_right_columns() {
        let ds = age_city();
        let partition = ds.partition();
        assert_eq!(partition.numeric, vec!["age"]);
        assert_eq!(partition.categorical, vec!["city"]);

        let hist = histogram_panel(&ds, None, 30).ready().unwrap();
        assert_eq!(hist.column, "age");
        assert_eq!(hist.bins.iter().map(|b| b.count).sum::<usize>(), 4);

        assert_eq!(box_panel(&ds, None).ready().unwrap().column, "age");

        let pie = pie_panel(&ds, None).ready().unwrap();
        assert_eq!(pie.column, "city");
        assert_eq!(pie.slices.iter().map(|s| s.count).sum::<usize>(), 5);
        assert_eq!(pie.total, 5);
    }

    #[test]
    fn single_numeric_column_has_no_heatmap() {
        let ds = age_city();
        assert!(matches!(correlation_panel(&ds), Panel::Unavailable(_)));
    }

    #[test]
    fn text_only_table_degrades_gracefully() {
        let ds = parse_csv_bytes(b"name,city\nann,Paris\nbob,Rome\n").unwrap();
        assert!(histogram_panel(&ds, None, 30).ready().is_none());
        assert!(box_panel(&ds, None).ready().is_none());
        assert!(correlation_panel(&ds).ready().is_none());
        assert!(scatter_panel(&ds, None, None, Some("city")).ready().is_none());
        assert!(pie_panel(&ds, Some("name")).ready().is_some());
    }

    #[test]
    fn numeric_only_table_has_no_pie() {
        let ds = parse_csv_bytes(b"a,b\n1,2\n3,4\n").unwrap();
        assert_eq!(
            pie_panel(&ds, None),
            Panel::Unavailable("No categorical columns available for pie chart.".into())
        );
    }

    #[test]
    fn zero_row_table_degrades_gracefully() {
        let ds = parse_csv_bytes(b"a,b\n").unwrap();
        assert!(histogram_panel(&ds, None, 30).ready().is_none());
        assert!(box_panel(&ds, None).ready().is_none());
        assert!(pie_panel(&ds, None).ready().is_none());
    }

    #[test]
    fn all_missing_column_is_unavailable_not_a_panic() {
        let ds = parse_csv_bytes(b"x,y\n,1\n,2\n").unwrap();
        assert!(histogram_panel(&ds, Some("x"), 10).ready().is_none());
        assert!(box_panel(&ds, Some("x")).ready().is_none());
        assert!(histogram_panel(&ds, Some("y"), 10).ready().is_some());
        let corr = correlation_panel(&ds).ready().unwrap();
        assert_eq!(corr.get(0, 1), None);
    }

    #[test]
    fn stale_selection_falls_back_to_first_option() {
        let options = vec!["a".to_string(), "b".to_string()];
        assert_eq!(resolve_column(Some("b"), &options), Some("b"));
        assert_eq!(resolve_column(Some("gone"), &options), Some("a"));
        assert_eq!(resolve_column(None, &[]), None);
    }

    #[test]
    fn scatter_groups_by_colour_column() {
        let ds = parse_csv_bytes(b"x,y,g\n1,2,a\n2,,a\n3,4,b\n5,6,\n7,8,a\n").unwrap();
        let chart = scatter_panel(&ds, Some("x"), Some("y"), Some("g"))
            .ready()
            .unwrap();
        assert_eq!(chart.color.as_deref(), Some("g"));
        let labels: Vec<_> = chart.groups.iter().map(ScatterGroup::label).collect();
        assert_eq!(labels, vec!["a", "b", "(missing)"]);
        assert_eq!(chart.groups[0].points, vec![[1.0, 2.0], [7.0, 8.0]]);
        let total: usize = chart.groups.iter().map(|g| g.points.len()).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn scatter_groups_keep_first_appearance_order() {
        let ds = parse_csv_bytes(b"x,y,g\n1,1,zeta\n2,2,\n3,3,alpha\n4,4,zeta\n5,5,mid\n")
            .unwrap();
        let chart = scatter_panel(&ds, Some("x"), Some("y"), Some("g"))
            .ready()
            .unwrap();
        let labels: Vec<_> = chart.groups.iter().map(ScatterGroup::label).collect();
        assert_eq!(labels, vec!["zeta", "(missing)", "alpha", "mid"]);
        assert_eq!(chart.groups[0].points, vec![[1.0, 1.0], [4.0, 4.0]]);
    }

    #[test]
    fn infinite_cells_do_not_distort_panels() {
        let ds = parse_csv_bytes(b"x,y\n1,1\n2,2\n3,3\ninf,4\n").unwrap();
        let hist = histogram_panel(&ds, Some("x"), 30).ready().unwrap();
        assert_eq!(hist.bins.len(), 30);
        assert_eq!(hist.bins.iter().map(|b| b.count).sum::<usize>(), 3);
        assert_eq!(hist.bins[29].end, 3.0);

        let boxed = box_panel(&ds, Some("x")).ready().unwrap();
        assert_eq!(boxed.summary.upper_whisker, 3.0);
        assert!(boxed.summary.outliers.is_empty());

        let corr = correlation_panel(&ds).ready().unwrap();
        let r = corr.get(0, 1).unwrap();
        assert!(r.is_finite() && (r - 1.0).abs() < 1e-9);

        let chart = scatter_panel(&ds, Some("x"), Some("y"), None).ready().unwrap();
        assert_eq!(chart.groups[0].points.len(), 3);
    }

    #[test]
    fn scatter_without_colour_is_one_series() {
        let ds = parse_csv_bytes(b"x,y,g\n1,2,a\n3,4,b\n").unwrap();
        let chart = scatter_panel(&ds, Some("x"), Some("y"), None).ready().unwrap();
        assert_eq!(chart.color, None);
        assert_eq!(chart.groups.len(), 1);
        assert_eq!(chart.groups[0].points, vec![[1.0, 2.0], [3.0, 4.0]]);

        // a numeric colour column is not a grouping
        let chart = scatter_panel(&ds, Some("x"), Some("y"), Some("y")).ready().unwrap();
        assert_eq!(chart.groups.len(), 1);
    }

    #[test]
    fn pie_slices_cover_the_full_turn() {
        let ds = parse_csv_bytes(b"c\na\nb\na\nc\na\n").unwrap();
        let pie = pie_panel(&ds, Some("c")).ready().unwrap();
        let labels: Vec<_> = pie.slices.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "b", "c"]);
        assert_eq!(pie.slices[0].start_turn, 0.0);
        assert!((pie.slices.last().unwrap().end_turn - 1.0).abs() < 1e-12);
        assert!((pie.slices.iter().map(|s| s.fraction).sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn slice_outline_starts_at_centre_and_top() {
        let slice = PieSlice {
            label: "half".into(),
            count: 1,
            fraction: 0.5,
            start_turn: 0.0,
            end_turn: 0.5,
        };
        let outline = slice.outline(64);
        assert_eq!(outline[0], [0.0, 0.0]);
        assert_eq!(outline[1], [0.0, 1.0]);
        let last = outline.last().unwrap();
        assert!(last[0].abs() < 1e-9 && (last[1] + 1.0).abs() < 1e-9);
        // clockwise from 12 o'clock: the first half sweeps through positive x
        assert!(outline.iter().all(|p| p[0] >= -1e-9));
    }
}
