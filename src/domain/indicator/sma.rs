//! Simple moving average over a close-price column.
//!
//! Uses a running sum; the first `period - 1` values are `None`.

pub fn calculate_sma(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut values = vec![None; closes.len()];
    if period == 0 || closes.len() < period {
        return values;
    }

    let mut sum: f64 = closes[..period].iter().sum();
    values[period - 1] = Some(sum / period as f64);

    for i in period..closes.len() {
        sum += closes[i] - closes[i - period];
        values[i] = Some(sum / period as f64);
    }

    values
}
