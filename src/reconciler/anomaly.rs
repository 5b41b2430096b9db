//! Statistical outlier flagging over observed amounts

/// Flag amounts exceeding mean + 2 standard deviations.
///
/// Mean and population standard deviation are computed over the numeric
/// subset only; non-numeric entries never flag. An empty numeric subset
/// yields all-false flags. Recomputed over the full sequence per call,
/// O(n) by design at this scale (an incremental Welford accumulator would
/// be a drop-in replacement with identical output at higher volume).
pub fn anomaly_flags(amounts: &[Option<f64>]) -> Vec<bool> {
    let valid: Vec<f64> = amounts.iter().filter_map(|a| *a).collect();

    if valid.is_empty() {
        return vec![false; amounts.len()];
    }

    let mean = valid.iter().sum::<f64>() / valid.len() as f64;
    let variance =
        valid.iter().map(|a| (a - mean).powi(2)).sum::<f64>() / valid.len() as f64;
    let threshold = mean + 2.0 * variance.sqrt();

    amounts
        .iter()
        .map(|a| a.map_or(false, |v| v > threshold))
        .collect()
}
