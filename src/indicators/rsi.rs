//! Relative Strength Index (Wilder smoothing)

/// Compute an RSI series aligned 1:1 with `closes`.
///
/// The first `period` entries are warm-up and hold `f64::NAN`. The value at
/// index `period` is seeded from the simple average of the first `period`
/// gains and losses; every later value uses Wilder's recurrence
/// `avg = (avg * (period - 1) + x) / period`.
///
/// A window with no losses reads exactly 100, including a flat window.
///
/// When `period == 0` or there are not more than `period` closes, every
/// entry is NaN. Callers are expected to guarantee enough bars beforehand.
pub fn compute_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let mut rsi = vec![f64::NAN; closes.len()];
    if period == 0 || closes.len() <= period {
        return rsi;
    }

    let (mut gain_sum, mut loss_sum) = (0.0, 0.0);
    for i in 1..=period {
        let delta = closes[i] - closes[i - 1];
        if delta > 0.0 {
            gain_sum += delta;
        } else if delta < 0.0 {
            loss_sum -= delta;
        }
    }

    let n = period as f64;
    let mut avg_gain = gain_sum / n;
    let mut avg_loss = loss_sum / n;
    rsi[period] = rsi_value(avg_gain, avg_loss);

    for i in (period + 1)..closes.len() {
        let delta = closes[i] - closes[i - 1];
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);

        avg_gain = (avg_gain * (n - 1.0) + gain) / n;
        avg_loss = (avg_loss * (n - 1.0) + loss) / n;
        rsi[i] = rsi_value(avg_gain, avg_loss);
    }

    rsi
}

#[inline]
fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
