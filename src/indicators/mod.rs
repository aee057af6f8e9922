//! Technical indicators
//!
//! Wilder RSI and strict pivot detection over plain `f64` series

mod pivot;
mod rsi;

pub use pivot::{is_pivot_high, is_pivot_low, PivotKind};
pub use rsi::compute_rsi;
