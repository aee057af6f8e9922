//! Divergence analysis module
//!
//! Classifies regular bullish/bearish RSI divergence at the most recent
//! confirmed bar: the oscillator pivots in one direction while price makes
//! a new extreme in the other.

mod analyzer;
mod types;

pub use analyzer::{analyze, bars_since_pivot, min_bars};
pub use types::{Divergence, DivergenceAlert, DivergenceError, DivergenceKind, DivergenceParams};
