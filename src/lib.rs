// Suppress warning from PyO3 macro expansion (fixed in newer PyO3 versions)
#![allow(non_local_definitions)]

//! RaptorRisk - Monte Carlo risk and return simulation engine.
//!
//! This crate provides:
//! - Trade-outcome simulation of compounding win/loss sequences
//! - Consecutive-loss drawdown estimation
//! - Correlation matrix construction and positive-definite repair
//! - Correlated multi-asset price path simulation
//! - Return and risk metrics (Sharpe, Sortino, Calmar, drawdown)

pub mod analysis;
pub mod core;
pub mod correlation;
pub mod metrics;
pub mod portfolio;
#[cfg(feature = "python")]
pub mod python;
pub mod trading;

pub use analysis::{
    run_asset_simulation, run_risk_return_analysis, AssetSimulationReport, RiskReturnReport,
};
pub use crate::core::{RaptorError, Result};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Python module entry point
#[cfg(feature = "python")]
#[pymodule]
fn _raptorrisk(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    // Register classes
    m.add_class::<python::bindings::PyTradingSimulator>()?;
    m.add_class::<python::bindings::PyPerformanceMetrics>()?;

    // Register drawdown functions
    m.add_function(wrap_pyfunction!(python::bindings::simulate_drawdown, m)?)?;
    m.add_function(wrap_pyfunction!(python::bindings::worst_case_drawdown, m)?)?;

    // Register correlation functions
    m.add_function(wrap_pyfunction!(python::bindings::build_uniform_correlation, m)?)?;
    m.add_function(wrap_pyfunction!(python::bindings::build_random_correlation, m)?)?;
    m.add_function(wrap_pyfunction!(python::bindings::repair_to_positive_definite, m)?)?;
    m.add_function(wrap_pyfunction!(python::bindings::is_positive_definite, m)?)?;

    // Register simulation functions
    m.add_function(wrap_pyfunction!(python::bindings::simulate_correlated_prices, m)?)?;
    m.add_function(wrap_pyfunction!(python::bindings::simulate_portfolio_risk, m)?)?;

    // Register metrics
    m.add_function(wrap_pyfunction!(python::bindings::compute_metrics, m)?)?;

    Ok(())
}
