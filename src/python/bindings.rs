//! PyO3 function bindings for RaptorRisk.

use numpy::{PyArray1, PyArray2, PyReadonlyArray1, PyReadonlyArray2};
use pyo3::prelude::*;

use crate::core::config::RepairConfig;
use crate::core::rng::seeded_rng;
use crate::core::types::PerformanceMetrics;
use crate::correlation;
use crate::metrics;
use crate::portfolio;
use crate::trading::{self, TradingSimulator};

use super::numpy_bridge::*;

// ============================================================================
// Simulator and Result Classes
// ============================================================================

/// Python-exposed trade-outcome simulator.
#[pyclass(name = "TradingSimulator")]
#[derive(Debug, Clone)]
pub struct PyTradingSimulator {
    inner: TradingSimulator,
}

#[pymethods]
impl PyTradingSimulator {
    #[new]
    #[pyo3(signature = (initial_aum=100000.0, win_rate=0.4, trades_per_year=30, risk_per_trade=0.01))]
    fn new(
        initial_aum: f64,
        win_rate: f64,
        trades_per_year: usize,
        risk_per_trade: f64,
    ) -> PyResult<Self> {
        Ok(Self {
            inner: TradingSimulator::new(initial_aum, win_rate, trades_per_year, risk_per_trade)?,
        })
    }

    #[getter]
    fn initial_aum(&self) -> f64 {
        self.inner.initial_aum()
    }

    #[getter]
    fn win_rate(&self) -> f64 {
        self.inner.win_rate()
    }

    #[getter]
    fn trades_per_year(&self) -> usize {
        self.inner.trades_per_year()
    }

    #[getter]
    fn risk_per_trade(&self) -> f64 {
        self.inner.risk_per_trade()
    }

    /// New simulator with a different win rate.
    fn with_win_rate(&self, win_rate: f64) -> PyResult<Self> {
        Ok(Self {
            inner: self.inner.with_win_rate(win_rate)?,
        })
    }

    fn simulate_trade(&self, current_aum: f64, is_win: bool, return_per_unit_risk: f64) -> f64 {
        self.inner.simulate_trade(current_aum, is_win, return_per_unit_risk)
    }

    /// Terminal AUM of `num_simulations` independent years.
    #[pyo3(signature = (return_per_unit_risk, num_simulations, win_rate=None, seed=42))]
    fn simulate_year<'py>(
        &self,
        py: Python<'py>,
        return_per_unit_risk: f64,
        num_simulations: usize,
        win_rate: Option<f64>,
        seed: u64,
    ) -> PyResult<&'py PyArray1<f64>> {
        let win_rate = win_rate.unwrap_or(self.inner.win_rate());
        let sim = self.inner;
        let finals = py.allow_threads(move || {
            sim.simulate_year_par(seed, win_rate, return_per_unit_risk, num_simulations)
        })?;
        Ok(vec_to_numpy_f64(py, finals))
    }

    /// Mean AUM after each trade.
    #[pyo3(signature = (return_per_unit_risk, num_simulations, win_rate=None, seed=42))]
    fn average_trade_progression<'py>(
        &self,
        py: Python<'py>,
        return_per_unit_risk: f64,
        num_simulations: usize,
        win_rate: Option<f64>,
        seed: u64,
    ) -> PyResult<&'py PyArray1<f64>> {
        let win_rate = win_rate.unwrap_or(self.inner.win_rate());
        let mut rng = seeded_rng(seed);
        let progression = self.inner.average_trade_progression(
            &mut rng,
            win_rate,
            return_per_unit_risk,
            num_simulations,
        )?;
        Ok(vec_to_numpy_f64(py, progression))
    }

    /// Terminal AUMs as percentage returns.
    fn percentage_returns<'py>(
        &self,
        py: Python<'py>,
        final_aums: PyReadonlyArray1<f64>,
    ) -> PyResult<&'py PyArray1<f64>> {
        let finals = numpy_to_vec_f64(final_aums)?;
        Ok(vec_to_numpy_f64(py, self.inner.percentage_returns(&finals)))
    }

    fn __repr__(&self) -> String {
        format!(
            "TradingSimulator(initial_aum={:.2}, win_rate={:.2}, trades_per_year={}, risk_per_trade={:.4})",
            self.inner.initial_aum(),
            self.inner.win_rate(),
            self.inner.trades_per_year(),
            self.inner.risk_per_trade()
        )
    }
}

/// Python-exposed performance metrics. Undefined ratios are NaN.
#[pyclass(name = "PerformanceMetrics")]
#[derive(Debug, Clone)]
pub struct PyPerformanceMetrics {
    #[pyo3(get)]
    pub total_return: f64,
    #[pyo3(get)]
    pub annualized_return: f64,
    #[pyo3(get)]
    pub annualized_volatility: f64,
    #[pyo3(get)]
    pub max_drawdown: f64,
    #[pyo3(get)]
    pub sharpe: f64,
    #[pyo3(get)]
    pub sortino: f64,
    #[pyo3(get)]
    pub calmar: f64,
}

impl From<PerformanceMetrics> for PyPerformanceMetrics {
    fn from(m: PerformanceMetrics) -> Self {
        Self {
            total_return: m.total_return,
            annualized_return: m.annualized_return,
            annualized_volatility: m.annualized_volatility,
            max_drawdown: m.max_drawdown,
            sharpe: m.sharpe_or_nan(),
            sortino: m.sortino_or_nan(),
            calmar: m.calmar_or_nan(),
        }
    }
}

#[pymethods]
impl PyPerformanceMetrics {
    fn __repr__(&self) -> String {
        format!(
            "PerformanceMetrics(return={:.4}, vol={:.4}, max_dd={:.4}, sharpe={:.2})",
            self.total_return, self.annualized_volatility, self.max_drawdown, self.sharpe
        )
    }

    /// Convert to a dictionary keyed by display name.
    fn to_dict(&self, py: Python) -> PyResult<PyObject> {
        let dict = pyo3::types::PyDict::new(py);
        dict.set_item("Total Cumulative Return", self.total_return)?;
        dict.set_item("Annualized Return", self.annualized_return)?;
        dict.set_item("Annualized Volatility", self.annualized_volatility)?;
        dict.set_item("Maximum Drawdown", self.max_drawdown)?;
        dict.set_item("Sharpe Ratio", self.sharpe)?;
        dict.set_item("Sortino Ratio", self.sortino)?;
        dict.set_item("Calmar Ratio", self.calmar)?;
        Ok(dict.into())
    }
}

// ============================================================================
// Drawdown
// ============================================================================

/// Expected longest losing streak times risk, in percent.
#[pyfunction]
#[pyo3(signature = (win_rate_pct, trades_per_year, risk_per_trade_pct, simulations=10000, seed=42))]
pub fn simulate_drawdown(
    py: Python<'_>,
    win_rate_pct: f64,
    trades_per_year: usize,
    risk_per_trade_pct: f64,
    simulations: usize,
    seed: u64,
) -> PyResult<f64> {
    let drawdown = py.allow_threads(move || {
        trading::simulate_drawdown_par(
            seed,
            win_rate_pct,
            trades_per_year,
            risk_per_trade_pct,
            simulations,
        )
    })?;
    Ok(drawdown)
}

/// Drawdown with every loss back-to-back, in percent.
#[pyfunction]
pub fn worst_case_drawdown(win_rate_pct: f64, trades_per_year: usize, risk_per_trade_pct: f64) -> f64 {
    trading::worst_case_drawdown(win_rate_pct, trades_per_year, risk_per_trade_pct)
}

// ============================================================================
// Correlation Matrices
// ============================================================================

#[pyfunction]
pub fn build_uniform_correlation<'py>(
    py: Python<'py>,
    n: usize,
    corr: f64,
) -> PyResult<&'py PyArray2<f64>> {
    let matrix = correlation::build_uniform_correlation(n, corr)?;
    Ok(matrix_to_numpy(py, &matrix))
}

#[pyfunction]
#[pyo3(signature = (n, min_corr, max_corr, seed=42))]
pub fn build_random_correlation<'py>(
    py: Python<'py>,
    n: usize,
    min_corr: f64,
    max_corr: f64,
    seed: u64,
) -> PyResult<&'py PyArray2<f64>> {
    let mut rng = seeded_rng(seed);
    let matrix = correlation::build_random_correlation(&mut rng, n, min_corr, max_corr)?;
    Ok(matrix_to_numpy(py, &matrix))
}

/// Nearest positive-definite matrix.
#[pyfunction]
#[pyo3(signature = (matrix, max_iterations=100, normalize_diagonal=true))]
pub fn repair_to_positive_definite<'py>(
    py: Python<'py>,
    matrix: PyReadonlyArray2<f64>,
    max_iterations: usize,
    normalize_diagonal: bool,
) -> PyResult<&'py PyArray2<f64>> {
    let config = RepairConfig {
        max_iterations,
        normalize_diagonal,
    };
    let repaired = correlation::repair_with_config(&numpy_to_matrix(matrix), &config)?;
    Ok(matrix_to_numpy(py, &repaired))
}

#[pyfunction]
pub fn is_positive_definite(matrix: PyReadonlyArray2<f64>) -> bool {
    correlation::is_positive_definite(&numpy_to_matrix(matrix))
}

// ============================================================================
// Price Simulation
// ============================================================================

/// Correlated price paths.
///
/// Returns `(asset_prices, portfolio_prices, log_returns)`.
#[pyfunction]
#[pyo3(signature = (num_assets, corr_matrix, mean_vector, vol_vector, trading_days, seed=42))]
pub fn simulate_correlated_prices<'py>(
    py: Python<'py>,
    num_assets: usize,
    corr_matrix: PyReadonlyArray2<f64>,
    mean_vector: PyReadonlyArray1<f64>,
    vol_vector: PyReadonlyArray1<f64>,
    trading_days: usize,
    seed: u64,
) -> PyResult<(&'py PyArray2<f64>, &'py PyArray1<f64>, &'py PyArray2<f64>)> {
    let corr = numpy_to_matrix(corr_matrix);
    let mean = numpy_to_vec_f64(mean_vector)?;
    let vol = numpy_to_vec_f64(vol_vector)?;

    let mut rng = seeded_rng(seed);
    let (paths, log_returns) = portfolio::simulate_correlated_prices(
        &mut rng,
        num_assets,
        &corr,
        &mean,
        &vol,
        trading_days,
    )?;

    Ok((
        matrix_to_numpy(py, &paths.assets),
        vec_to_numpy_f64(py, paths.portfolio),
        matrix_to_numpy(py, &log_returns),
    ))
}

/// Average daily volatility of an equal-weight correlated portfolio.
#[pyfunction]
#[pyo3(signature = (num_assets, correlation, num_simulations=1000, seed=42))]
pub fn simulate_portfolio_risk(
    num_assets: usize,
    correlation: f64,
    num_simulations: usize,
    seed: u64,
) -> PyResult<f64> {
    let mut rng = seeded_rng(seed);
    Ok(portfolio::simulate_portfolio_risk(
        &mut rng,
        num_assets,
        correlation,
        num_simulations,
    )?)
}

// ============================================================================
// Metrics
// ============================================================================

#[pyfunction]
#[pyo3(signature = (prices, returns, num_years, risk_free_rate=0.0))]
pub fn compute_metrics(
    prices: PyReadonlyArray1<f64>,
    returns: PyReadonlyArray1<f64>,
    num_years: f64,
    risk_free_rate: f64,
) -> PyResult<PyPerformanceMetrics> {
    let prices = numpy_to_vec_f64(prices)?;
    let returns = numpy_to_vec_f64(returns)?;
    let m = metrics::compute_metrics(&prices, &returns, num_years, risk_free_rate)?;
    Ok(m.into())
}
