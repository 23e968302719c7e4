//! Peak-to-trough drawdown of a price series.

/// Drawdown at each point as a fraction of the running peak.
///
/// # Arguments
/// * `prices` - Price or equity values over time
///
/// # Returns
/// `(cummax - price) / cummax` for every point
pub fn drawdown_curve(prices: &[f64]) -> Vec<f64> {
    let n = prices.len();
    if n == 0 {
        return vec![];
    }

    let mut curve = vec![0.0; n];
    let mut peak = prices[0];

    for i in 0..n {
        if prices[i] > peak {
            peak = prices[i];
        }
        if peak > 0.0 {
            curve[i] = (peak - prices[i]) / peak;
        }
    }

    curve
}

/// Maximum drawdown as a fraction of the peak.
pub fn max_drawdown(prices: &[f64]) -> f64 {
    drawdown_curve(prices).iter().fold(0.0f64, |a, &b| a.max(b))
}

/// Calmar ratio, undefined when there was no drawdown.
///
/// # Arguments
/// * `annualized_return` - Annualized return as a fraction
/// * `max_drawdown` - Maximum drawdown as a fraction
pub fn calmar_ratio(annualized_return: f64, max_drawdown: f64) -> Option<f64> {
    if max_drawdown == 0.0 {
        return None;
    }
    Some(annualized_return / max_drawdown)
}
