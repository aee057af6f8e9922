//! Regular divergence detection at the most recent confirmed bar

use super::{Divergence, DivergenceError, DivergenceParams};
use crate::indicators::{is_pivot_high, is_pivot_low, PivotKind};

/// Bars needed for an RSI of `rsi_period` to be defined at the confirmed bar
/// and for the confirmed bar's pivot window to fit
pub fn min_bars(rsi_period: usize, params: &DivergenceParams) -> usize {
    let window = params.lookback_left + params.lookback_right + 1;
    (rsi_period + params.lookback_right + 1).max(window)
}

/// Distance from `from` back to the nearest earlier pivot of `kind`.
///
/// Scans `from - 1` down to index 0 and returns `None` when no earlier
/// index qualifies.
pub fn bars_since_pivot(
    series: &[f64],
    kind: PivotKind,
    params: &DivergenceParams,
    from: usize,
) -> Option<usize> {
    (0..from)
        .rev()
        .find(|&i| kind.is_pivot(series, params.lookback_left, params.lookback_right, i))
        .map(|i| from - i)
}

/// Classify regular divergence at `last_index - lookback_right`.
///
/// `oscillator`, `highs` and `lows` must be index-aligned. Bullish requires an
/// oscillator pivot low at the confirmed bar that is higher than the previous
/// in-range pivot low while price prints a lower low; bearish is the mirror
/// on pivot highs.
pub fn analyze(
    oscillator: &[f64],
    highs: &[f64],
    lows: &[f64],
    params: &DivergenceParams,
) -> Result<Divergence, DivergenceError> {
    let len = oscillator.len();
    if highs.len() != len || lows.len() != len {
        return Err(DivergenceError::LengthMismatch {
            oscillator: len,
            highs: highs.len(),
            lows: lows.len(),
        });
    }

    let need = params.lookback_left + params.lookback_right + 1;
    if len < need {
        return Err(DivergenceError::InsufficientData { got: len, need });
    }

    let confirmed = len - 1 - params.lookback_right;
    let current = oscillator[confirmed];

    let (left, right) = (params.lookback_left, params.lookback_right);
    let pivot_low = is_pivot_low(oscillator, left, right, confirmed);
    let pivot_high = is_pivot_high(oscillator, left, right, confirmed);

    let bars_since_low = bars_since_pivot(oscillator, PivotKind::Low, params, confirmed);
    let bars_since_high = bars_since_pivot(oscillator, PivotKind::High, params, confirmed);

    let bullish = pivot_low
        && params.in_range(bars_since_low)
        && bars_since_low.is_some_and(|bars| {
            let prior = confirmed - bars;
            current > oscillator[prior] && lows[confirmed] < lows[prior]
        });

    let bearish = pivot_high
        && params.in_range(bars_since_high)
        && bars_since_high.is_some_and(|bars| {
            let prior = confirmed - bars;
            current < oscillator[prior] && highs[confirmed] > highs[prior]
        });

    Ok(Divergence {
        confirmed_index: confirmed,
        oscillator: current,
        pivot_low,
        pivot_high,
        bars_since_low,
        bars_since_high,
        bullish,
        bearish,
    })
}
