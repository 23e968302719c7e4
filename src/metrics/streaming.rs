//! Single-pass return statistics using Welford's algorithm.

/// Running mean, variance and downside moments of a return series.
///
/// NaN observations are ignored.
#[derive(Debug, Clone, Default)]
pub struct ReturnStats {
    /// Number of observations.
    count: usize,
    /// Running mean.
    mean: f64,
    /// Running M2 for variance calculation.
    m2: f64,
    /// Sum of squared negative returns.
    downside_sum_sq: f64,
    /// Count of negative returns.
    downside_count: usize,
}

impl ReturnStats {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate every value of `returns`.
    pub fn from_returns(returns: &[f64]) -> Self {
        let mut stats = Self::new();
        for &r in returns {
            stats.update(r);
        }
        stats
    }

    /// Add one return.
    pub fn update(&mut self, return_value: f64) {
        if return_value.is_nan() {
            return;
        }
        self.count += 1;

        let delta = return_value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = return_value - self.mean;
        self.m2 += delta * delta2;

        if return_value < 0.0 {
            self.downside_sum_sq += return_value * return_value;
            self.downside_count += 1;
        }
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample variance (n - 1 denominator); 0 with fewer than two values.
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            return 0.0;
        }
        self.m2 / (self.count - 1) as f64
    }

    /// Population variance.
    pub fn variance_population(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.m2 / self.count as f64
    }

    /// Sample standard deviation.
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Number of negative returns.
    #[inline]
    pub fn downside_count(&self) -> usize {
        self.downside_count
    }

    /// Root mean square of the negative returns, `None` if there were none.
    pub fn downside_deviation(&self) -> Option<f64> {
        if self.downside_count == 0 {
            return None;
        }
        Some((self.downside_sum_sq / self.downside_count as f64).sqrt())
    }
}
