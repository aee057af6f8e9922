//! Divergence types

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Pivot window and prior-pivot distance gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivergenceParams {
    /// Bars to the left of a pivot
    pub lookback_left: usize,
    /// Bars to the right of a pivot (confirmation delay)
    pub lookback_right: usize,
    /// Minimum distance to the prior pivot, inclusive
    pub range_lower: usize,
    /// Maximum distance to the prior pivot, inclusive
    pub range_upper: usize,
}

impl Default for DivergenceParams {
    fn default() -> Self {
        Self {
            lookback_left: 5,
            lookback_right: 5,
            range_lower: 5,
            range_upper: 60,
        }
    }
}

impl DivergenceParams {
    /// Whether a prior pivot `bars_since` bars back is usable.
    /// `None` (no prior pivot) is never in range.
    pub fn in_range(&self, bars_since: Option<usize>) -> bool {
        bars_since.is_some_and(|bars| (self.range_lower..=self.range_upper).contains(&bars))
    }
}

/// Divergence direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DivergenceKind {
    /// Oscillator higher low, price lower low
    Bullish,
    /// Oscillator lower high, price higher high
    Bearish,
}

impl DivergenceKind {
    pub fn label(self) -> &'static str {
        match self {
            DivergenceKind::Bullish => "bullish",
            DivergenceKind::Bearish => "bearish",
        }
    }

    fn glyph(self) -> &'static str {
        match self {
            DivergenceKind::Bullish => "🟢",
            DivergenceKind::Bearish => "🔴",
        }
    }

    fn title(self) -> &'static str {
        match self {
            DivergenceKind::Bullish => "Bullish",
            DivergenceKind::Bearish => "Bearish",
        }
    }
}

/// Analysis result at the confirmed bar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Divergence {
    /// `last_index - lookback_right`
    pub confirmed_index: usize,
    /// Oscillator value at the confirmed bar
    pub oscillator: f64,
    /// Confirmed bar is an oscillator pivot low
    pub pivot_low: bool,
    /// Confirmed bar is an oscillator pivot high
    pub pivot_high: bool,
    /// Distance back to the previous oscillator pivot low, if any
    pub bars_since_low: Option<usize>,
    /// Distance back to the previous oscillator pivot high, if any
    pub bars_since_high: Option<usize>,
    pub bullish: bool,
    pub bearish: bool,
}

impl Divergence {
    /// Kinds detected at the confirmed bar, bullish first
    pub fn kinds(&self) -> Vec<DivergenceKind> {
        let mut kinds = Vec::with_capacity(2);
        if self.bullish {
            kinds.push(DivergenceKind::Bullish);
        }
        if self.bearish {
            kinds.push(DivergenceKind::Bearish);
        }
        kinds
    }
}

/// An outbound divergence alert for one instrument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivergenceAlert {
    pub symbol: String,
    pub timeframe: String,
    pub kind: DivergenceKind,
}

impl DivergenceAlert {
    pub fn new(
        symbol: impl Into<String>,
        timeframe: impl Into<String>,
        kind: DivergenceKind,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe: timeframe.into(),
            kind,
        }
    }

    /// Message text handed to the notifier verbatim
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DivergenceAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} → Regular {} Divergence detected on {}",
            self.kind.glyph(),
            self.symbol,
            self.kind.title(),
            self.timeframe
        )
    }
}

/// Analyzer precondition failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DivergenceError {
    /// Oscillator, high and low series differ in length
    #[error("Series length mismatch: oscillator={oscillator}, highs={highs}, lows={lows}")]
    LengthMismatch {
        oscillator: usize,
        highs: usize,
        lows: usize,
    },
    /// Not enough bars for the pivot window
    #[error("Insufficient data: got {got} bars, need {need}")]
    InsufficientData { got: usize, need: usize },
}
