//! Moving averages over the daily close series.
//!
//! SMA is a plain rolling mean, absent until a full window exists.
//! EWMA is the adjusted span-based form: alpha = 2/(span+1) and
//! `ema_t = sum((1-alpha)^i * close_(t-i)) / sum((1-alpha)^i)`, computed
//! by a numerator/denominator recursion so early values are weighted
//! means of the history seen so far rather than seed-biased. Defined
//! from the first observation.

/// Trailing simple moving average.
///
/// Returns one entry per input; `None` until `window` values exist.
#[must_use]
pub fn sma(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; closes.len()];
    if window == 0 || closes.len() < window {
        return result;
    }

    let mut sum: f64 = closes[..window].iter().sum();
    result[window - 1] = Some(sum / window as f64);
    for i in window..closes.len() {
        sum += closes[i] - closes[i - window];
        result[i] = Some(sum / window as f64);
    }
    result
}

/// Adjusted exponentially weighted moving average with the given span.
///
/// Returns one entry per input, defined from the first.
#[must_use]
pub fn ewma(closes: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let decay = 1.0 - alpha;

    let mut result = Vec::with_capacity(closes.len());
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for &close in closes {
        numerator = numerator * decay + close;
        denominator = denominator * decay + 1.0;
        result.push(numerator / denominator);
    }
    result
}

/// Rounds to two decimal places, halves away from zero.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
