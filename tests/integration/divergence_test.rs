//! Integration tests for the oscillator, pivot and divergence pipeline

use divergence_scanner::divergence::{analyze, min_bars, DivergenceParams};
use divergence_scanner::indicators::{compute_rsi, is_pivot_high, is_pivot_low};

/// Synthetic daily closes: a slow sine swing with a drift
fn swing_closes(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let t = i as f64;
            100.0 + (t / 6.0).sin() * 8.0 + (t / 2.3).cos() * 1.5 + t * 0.05
        })
        .collect()
}

#[test]
fn test_full_window_never_panics() {
    let params = DivergenceParams::default();
    let need = min_bars(14, &params);

    for len in need..300 {
        let closes = swing_closes(len);
        let highs: Vec<f64> = closes.iter().map(|c| c + 0.5).collect();
        let lows: Vec<f64> = closes.iter().map(|c| c - 0.5).collect();
        let rsi = compute_rsi(&closes, 14);

        let divergence = analyze(&rsi, &highs, &lows, &params).unwrap();
        assert_eq!(divergence.confirmed_index, len - 1 - params.lookback_right);
        if divergence.bullish {
            assert!(divergence.pivot_low);
            assert!(params.in_range(divergence.bars_since_low));
        }
        if divergence.bearish {
            assert!(divergence.pivot_high);
            assert!(params.in_range(divergence.bars_since_high));
        }
    }
}

#[test]
fn test_pivots_on_rsi_are_exclusive() {
    let closes = swing_closes(250);
    let rsi = compute_rsi(&closes, 14);
    for i in 0..rsi.len() {
        assert!(!(is_pivot_low(&rsi, 5, 5, i) && is_pivot_high(&rsi, 5, 5, i)));
    }
}

#[test]
fn test_rsi_pivots_found_on_swings() {
    let closes = swing_closes(250);
    let rsi = compute_rsi(&closes, 14);
    let lows = (0..rsi.len()).filter(|&i| is_pivot_low(&rsi, 5, 5, i)).count();
    let highs = (0..rsi.len()).filter(|&i| is_pivot_high(&rsi, 5, 5, i)).count();
    assert!(lows > 0);
    assert!(highs > 0);
}

#[test]
fn test_unset_rsi_never_pivots() {
    let closes = swing_closes(250);
    let rsi = compute_rsi(&closes, 14);
    for i in 0..14 {
        assert!(!is_pivot_low(&rsi, 5, 5, i));
        assert!(!is_pivot_high(&rsi, 5, 5, i));
    }
}
