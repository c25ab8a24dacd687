use std::collections::HashMap;

use super::model::{Column, ColumnType, Dataset};

// ---------------------------------------------------------------------------
// Overview
// ---------------------------------------------------------------------------

/// Headline numbers for the loaded table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overview {
    pub rows: usize,
    pub columns: usize,
    pub missing: usize,
    /// `(column name, dtype)` in table order.
    pub dtypes: Vec<(String, ColumnType)>,
}

pub fn overview(dataset: &Dataset) -> Overview {
    Overview {
        rows: dataset.n_rows(),
        columns: dataset.n_columns(),
        missing: dataset.missing_count(),
        dtypes: dataset
            .columns()
            .iter()
            .map(|c| (c.name.clone(), c.dtype))
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Describe
// ---------------------------------------------------------------------------

/// Descriptive statistics of one numeric column. `None` means undefined
/// (no values, or a single value for `std`).
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnSummary {
    pub fn of(column: &Column) -> Self {
        let mut values = column.present_values();
        values.sort_by(f64::total_cmp);

        ColumnSummary {
            name: column.name.clone(),
            count: values.len(),
            mean: mean(&values),
            std: sample_std(&values),
            min: values.first().copied(),
            q25: quantile_sorted(&values, 0.25),
            median: quantile_sorted(&values, 0.5),
            q75: quantile_sorted(&values, 0.75),
            max: values.last().copied(),
        }
    }

    /// Row labels and values in display order.
    pub fn rows(&self) -> [(&'static str, Option<f64>); 8] {
        [
            ("count", Some(self.count as f64)),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q25),
            ("50%", self.median),
            ("75%", self.q75),
            ("max", self.max),
        ]
    }
}

/// Statistics for every numeric column, or `None` when there are none.
pub fn describe(dataset: &Dataset) -> Option<Vec<ColumnSummary>> {
    let summaries: Vec<ColumnSummary> = dataset
        .numeric_columns()
        .map(ColumnSummary::of)
        .collect();
    if summaries.is_empty() {
        None
    } else {
        Some(summaries)
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Linear-interpolated quantile of already sorted values.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Pairwise Pearson correlation between numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major, `columns.len()²` entries. `None` where undefined.
    values: Vec<Option<f64>>,
}

impl CorrelationMatrix {
    pub fn size(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row * self.size() + col).copied().flatten()
    }
}

/// Correlation over all numeric columns, or `None` with fewer than two.
///
/// Each pair uses the rows where both cells are present.
pub fn correlation(dataset: &Dataset) -> Option<CorrelationMatrix> {
    let numeric: Vec<&Column> = dataset.numeric_columns().collect();
    if numeric.len() < 2 {
        return None;
    }
    let series: Vec<Vec<Option<f64>>> = numeric.iter().map(|c| c.numeric_values()).collect();
    let n = numeric.len();
    let mut values = vec![None; n * n];

    for i in 0..n {
        for j in i..n {
            let r = if i == j {
                let present: Vec<f64> = series[i].iter().flatten().copied().collect();
                sample_std(&present).filter(|s| *s > 0.0).map(|_| 1.0)
            } else {
                pearson(&series[i], &series[j])
            };
            values[i * n + j] = r;
            values[j * n + i] = r;
        }
    }

    Some(CorrelationMatrix {
        columns: numeric.iter().map(|c| c.name.clone()).collect(),
        values,
    })
}

fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mx;
        let dy = y - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    let denom = sxx.sqrt() * syy.sqrt();
    // zero for a constant side, infinite when the sums overflow
    if denom == 0.0 || !denom.is_finite() || !sxy.is_finite() {
        return None;
    }
    Some((sxy / denom).clamp(-1.0, 1.0))
}

// ---------------------------------------------------------------------------
// Value counts
// ---------------------------------------------------------------------------

/// Distinct non-missing values with their counts, most frequent first.
/// Ties keep first-appearance order.
pub fn value_counts(column: &Column) -> Vec<(String, usize)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for cell in column.cells.iter().filter(|c| !c.is_null()) {
        let label = cell.to_string();
        match counts.get_mut(&label) {
            Some(n) => *n += 1,
            None => {
                counts.insert(label.clone(), 1);
                order.push(label);
            }
        }
    }

    let mut result: Vec<(String, usize)> = order
        .into_iter()
        .map(|label| {
            let n = counts[&label];
            (label, n)
        })
        .collect();
    // stable sort keeps first appearance among equal counts
    result.sort_by(|a, b| b.1.cmp(&a.1));
    result
}

// ---------------------------------------------------------------------------
// Distribution shapes
// ---------------------------------------------------------------------------

/// One histogram bucket, `[start, end)` except the last which is closed.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width buckets spanning the data range. A constant column gets a
/// single bucket of width 1 centred on its value. Non-finite values are
/// ignored.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let bins = bins.max(1);
    let values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let (Some(min), Some(max)) = (
        values.iter().copied().reduce(f64::min),
        values.iter().copied().reduce(f64::max),
    ) else {
        return Vec::new();
    };

    if max == min {
        return vec![HistogramBin {
            start: min - 0.5,
            end: min + 0.5,
            count: values.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut result: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: min + width * i as f64,
            end: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for &v in &values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        result[idx].count += 1;
    }
    result
}

/// Five-number summary plus mean and Tukey outliers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub mean: f64,
    pub outliers: Vec<f64>,
}

pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile_sorted(&sorted, 0.25)?;
    let median = quantile_sorted(&sorted, 0.5)?;
    let q3 = quantile_sorted(&sorted, 0.75)?;
    let iqr = q3 - q1;
    let low_fence = q1 - 1.5 * iqr;
    let high_fence = q3 + 1.5 * iqr;

    let lower_whisker = sorted.iter().copied().find(|v| *v >= low_fence).unwrap_or(q1);
    let upper_whisker = sorted
        .iter()
        .rev()
        .copied()
        .find(|v| *v <= high_fence)
        .unwrap_or(q3);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < low_fence || *v > high_fence)
        .collect();

    Some(BoxSummary {
        lower_whisker,
        q1,
        median,
        q3,
        upper_whisker,
        mean: mean(&sorted)?,
        outliers,
    })
}
