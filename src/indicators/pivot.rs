//! Pivot point detection

use serde::{Deserialize, Serialize};

/// Pivot direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PivotKind {
    Low,
    High,
}

impl PivotKind {
    /// Evaluate this kind of pivot at `index`
    pub fn is_pivot(self, series: &[f64], left: usize, right: usize, index: usize) -> bool {
        match self {
            PivotKind::Low => is_pivot_low(series, left, right, index),
            PivotKind::High => is_pivot_high(series, left, right, index),
        }
    }
}

/// True if `series[index]` is strictly below every value within `left` bars
/// before and `right` bars after it.
///
/// Returns false when the window does not fit inside the series or the
/// centre is NaN. An unset (NaN) neighbour does not rule the pivot out.
pub fn is_pivot_low(series: &[f64], left: usize, right: usize, index: usize) -> bool {
    is_pivot(series, left, right, index, |centre, other| {
        other.is_nan() || centre < other
    })
}

/// Strict mirror of [`is_pivot_low`]
pub fn is_pivot_high(series: &[f64], left: usize, right: usize, index: usize) -> bool {
    is_pivot(series, left, right, index, |centre, other| {
        other.is_nan() || centre > other
    })
}

fn is_pivot(
    series: &[f64],
    left: usize,
    right: usize,
    index: usize,
    beats: impl Fn(f64, f64) -> bool,
) -> bool {
    if index < left || index + right >= series.len() {
        return false;
    }

    let centre = series[index];
    if centre.is_nan() {
        return false;
    }

    series[index - left..index]
        .iter()
        .chain(&series[index + 1..=index + right])
        .all(|&other| beats(centre, other))
}
