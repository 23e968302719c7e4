//! Simulation configuration.
//!
//! Defaults mirror the reference inputs of the risk/return and asset
//! correlation workflows. Every config validates itself before any sampling.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::{RaptorError, Result};
use super::types::TRADING_DAYS_PER_YEAR;

pub(crate) fn ensure_finite(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(RaptorError::invalid_parameter(format!(
            "{} must be finite, got {}",
            name, value
        )));
    }
    Ok(())
}

pub(crate) fn ensure_in_range(name: &str, value: f64, min: f64, max: f64) -> Result<()> {
    ensure_finite(name, value)?;
    if value < min || value > max {
        return Err(RaptorError::invalid_parameter(format!(
            "{} must be in [{}, {}], got {}",
            name, min, max, value
        )));
    }
    Ok(())
}

pub(crate) fn ensure_positive_count(name: &str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(RaptorError::invalid_config(format!("{} must be > 0", name)));
    }
    Ok(())
}

/// Inclusive numeric input range with a default and a step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

impl ParameterRange {
    /// Create a new range.
    pub const fn new(min: f64, max: f64, default: f64, step: f64) -> Self {
        Self {
            min,
            max,
            default,
            step,
        }
    }

    /// Check whether `value` lies within the range.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Grid values `min, min + step, ..., <= max`.
    pub fn values(&self) -> Vec<f64> {
        if self.step <= 0.0 || self.max < self.min {
            return vec![];
        }
        let n = ((self.max - self.min) / self.step + 1e-9).floor() as usize + 1;
        (0..n).map(|i| self.min + i as f64 * self.step).collect()
    }
}

/// Input bounds for the risk/return workflow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterBounds {
    pub trades_per_year: ParameterRange,
    /// Win rate, in percent.
    pub win_rate: ParameterRange,
    /// Risk per trade, in percent.
    pub risk_per_trade: ParameterRange,
    pub return_per_unit_risk: ParameterRange,
    pub num_simulations: ParameterRange,
}

impl Default for ParameterBounds {
    fn default() -> Self {
        Self {
            trades_per_year: ParameterRange::new(5.0, 100.0, 30.0, 5.0),
            win_rate: ParameterRange::new(28.0, 72.0, 40.0, 2.0),
            risk_per_trade: ParameterRange::new(0.25, 5.0, 1.0, 0.25),
            return_per_unit_risk: ParameterRange::new(0.5, 8.0, 3.0, 0.5),
            num_simulations: ParameterRange::new(10_000.0, 100_000.0, 10_000.0, 10_000.0),
        }
    }
}

/// Configuration for the trade-outcome workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReturnConfig {
    /// Starting capital.
    pub initial_aum: f64,
    pub trades_per_year: usize,
    /// Win rate, in percent (0-100).
    pub win_rate_pct: f64,
    /// Fraction of AUM risked per trade, in percent.
    pub risk_per_trade_pct: f64,
    pub return_per_unit_risk: f64,
    /// Trials per year simulation.
    pub num_simulations: usize,
    /// Trials for the consecutive-loss drawdown estimate.
    pub drawdown_simulations: usize,
    pub seed: u64,
}

impl Default for RiskReturnConfig {
    fn default() -> Self {
        Self {
            initial_aum: 100_000.0,
            trades_per_year: 30,
            win_rate_pct: 40.0,
            risk_per_trade_pct: 1.0,
            return_per_unit_risk: 3.0,
            num_simulations: 10_000,
            drawdown_simulations: 10_000,
            seed: 42,
        }
    }
}

impl RiskReturnConfig {
    /// Win rate as a fraction.
    #[inline]
    pub fn win_rate(&self) -> f64 {
        self.win_rate_pct / 100.0
    }

    /// Risk per trade as a fraction.
    #[inline]
    pub fn risk_per_trade(&self) -> f64 {
        self.risk_per_trade_pct / 100.0
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        ensure_finite("initial_aum", self.initial_aum)?;
        ensure_positive_count("trades_per_year", self.trades_per_year)?;
        ensure_in_range("win_rate_pct", self.win_rate_pct, 0.0, 100.0)?;
        ensure_in_range("risk_per_trade_pct", self.risk_per_trade_pct, 0.0, 100.0)?;
        ensure_finite("return_per_unit_risk", self.return_per_unit_risk)?;
        ensure_positive_count("num_simulations", self.num_simulations)?;
        ensure_positive_count("drawdown_simulations", self.drawdown_simulations)?;
        Ok(())
    }
}

/// How the asset correlation matrix is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CorrelationSpec {
    /// Single correlation for every asset pair.
    Uniform { correlation: f64 },
    /// Random pairwise correlations in `[min, max]`, repaired to PD.
    Range { min: f64, max: f64 },
}

impl Default for CorrelationSpec {
    fn default() -> Self {
        CorrelationSpec::Uniform { correlation: 0.4 }
    }
}

impl CorrelationSpec {
    /// Validate correlation bounds.
    pub fn validate(&self) -> Result<()> {
        match *self {
            CorrelationSpec::Uniform { correlation } => {
                ensure_in_range("correlation", correlation, -1.0, 1.0)
            }
            CorrelationSpec::Range { min, max } => {
                ensure_in_range("min_corr", min, -1.0, 1.0)?;
                ensure_in_range("max_corr", max, -1.0, 1.0)?;
                if min > max {
                    return Err(RaptorError::invalid_config(format!(
                        "min_corr ({}) cannot be greater than max_corr ({})",
                        min, max
                    )));
                }
                Ok(())
            }
        }
    }
}

/// Configuration for the correlated multi-asset workflow.
///
/// Return and volatility inputs are annual fractions (0.10 = 10%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSimulationConfig {
    pub num_assets: usize,
    pub correlation: CorrelationSpec,
    pub num_years: usize,
    pub mean_annual_return: f64,
    pub annual_volatility: f64,
    pub risk_free_rate: f64,
    /// Draw per-asset means uniformly within +/-50% of the base mean.
    pub randomize_mean: bool,
    /// Draw per-asset volatilities uniformly within +/-50% of the base.
    pub randomize_volatility: bool,
    pub seed: u64,
}

impl Default for AssetSimulationConfig {
    fn default() -> Self {
        Self {
            num_assets: 10,
            correlation: CorrelationSpec::default(),
            num_years: 5,
            mean_annual_return: 0.10,
            annual_volatility: 0.20,
            risk_free_rate: 0.0,
            randomize_mean: false,
            randomize_volatility: false,
            seed: 42,
        }
    }
}

impl AssetSimulationConfig {
    /// Total simulated trading days.
    #[inline]
    pub fn trading_days(&self) -> usize {
        self.num_years * TRADING_DAYS_PER_YEAR
    }

    /// Daily return compounding to the annual mean.
    pub fn mean_daily_return(&self) -> f64 {
        (1.0 + self.mean_annual_return).powf(1.0 / TRADING_DAYS_PER_YEAR as f64) - 1.0
    }

    /// Annual volatility scaled to one day.
    pub fn daily_volatility(&self) -> f64 {
        self.annual_volatility / (TRADING_DAYS_PER_YEAR as f64).sqrt()
    }

    /// Per-asset daily mean and volatility vectors.
    pub fn asset_vectors<R: Rng + ?Sized>(&self, rng: &mut R) -> (Vec<f64>, Vec<f64>) {
        let mean = self.mean_daily_return();
        let vol = self.daily_volatility();

        let means = if self.randomize_mean {
            (0..self.num_assets).map(|_| spread(rng, mean)).collect()
        } else {
            vec![mean; self.num_assets]
        };
        let vols = if self.randomize_volatility {
            (0..self.num_assets).map(|_| spread(rng, vol)).collect()
        } else {
            vec![vol; self.num_assets]
        };

        (means, vols)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        ensure_positive_count("num_assets", self.num_assets)?;
        ensure_positive_count("num_years", self.num_years)?;
        self.correlation.validate()?;
        ensure_finite("mean_annual_return", self.mean_annual_return)?;
        if self.mean_annual_return <= -1.0 {
            return Err(RaptorError::invalid_parameter(
                "mean_annual_return must be greater than -100%",
            ));
        }
        ensure_finite("annual_volatility", self.annual_volatility)?;
        if self.annual_volatility < 0.0 {
            return Err(RaptorError::invalid_parameter("annual_volatility must be >= 0"));
        }
        ensure_finite("risk_free_rate", self.risk_free_rate)?;
        Ok(())
    }
}

fn spread<R: Rng + ?Sized>(rng: &mut R, base: f64) -> f64 {
    let (lo, hi) = if base >= 0.0 { (0.5 * base, 1.5 * base) } else { (1.5 * base, 0.5 * base) };
    if lo == hi {
        return base;
    }
    rng.gen_range(lo..hi)
}

/// Positive-definite repair settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepairConfig {
    /// Diagonal-shift iterations before giving up.
    pub max_iterations: usize,
    /// Rescale the repaired matrix back to a unit diagonal.
    pub normalize_diagonal: bool,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            normalize_diagonal: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::seeded_rng;

    #[test]
    fn test_parameter_grid() {
        let bounds = ParameterBounds::default();
        let win_rates = bounds.win_rate.values();
        assert_eq!(win_rates.len(), 23);
        assert!((win_rates[0] - 28.0).abs() < 1e-12);
        assert!((win_rates[22] - 72.0).abs() < 1e-12);

        let risk = bounds.risk_per_trade.values();
        assert_eq!(risk.len(), 20);
        assert!((risk[19] - 5.0).abs() < 1e-9);

        assert!(bounds.trades_per_year.contains(30.0));
        assert!(!bounds.trades_per_year.contains(101.0));
    }

    #[test]
    fn test_risk_return_validation() {
        assert!(RiskReturnConfig::default().validate().is_ok());

        let bad = RiskReturnConfig {
            trades_per_year: 0,
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(RaptorError::InvalidConfig { .. })));

        let bad = RiskReturnConfig {
            win_rate_pct: 101.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_correlation_range_rejected_when_inverted() {
        let spec = CorrelationSpec::Range { min: 0.6, max: -0.2 };
        assert!(matches!(spec.validate(), Err(RaptorError::InvalidConfig { .. })));
        assert!(CorrelationSpec::Range { min: -0.2, max: 0.6 }.validate().is_ok());
    }

    #[test]
    fn test_daily_parameters() {
        let cfg = AssetSimulationConfig::default();
        assert_eq!(cfg.trading_days(), 1260);
        let compounded = (1.0 + cfg.mean_daily_return()).powi(252) - 1.0;
        assert!((compounded - 0.10).abs() < 1e-10);
        assert!((cfg.daily_volatility() * 252f64.sqrt() - 0.20).abs() < 1e-12);
    }

    #[test]
    fn test_randomized_vectors_stay_in_band() {
        let cfg = AssetSimulationConfig {
            randomize_mean: true,
            randomize_volatility: true,
            ..Default::default()
        };
        let mut rng = seeded_rng(1);
        let (means, vols) = cfg.asset_vectors(&mut rng);
        assert_eq!(means.len(), 10);
        let base_vol = cfg.daily_volatility();
        for v in vols {
            assert!(v >= 0.5 * base_vol && v <= 1.5 * base_vol);
        }
    }

    #[test]
    fn test_serde_roundtrip_tagged_spec() {
        let cfg = AssetSimulationConfig {
            correlation: CorrelationSpec::Range { min: -0.2, max: 0.6 },
            ..Default::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains("\"type\":\"range\""));
        let back: AssetSimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
