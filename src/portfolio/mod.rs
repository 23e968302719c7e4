//! Correlated price simulation and portfolio-level risk for RaptorRisk.

pub mod monte_carlo;
pub mod risk;
pub mod sweep;

pub use monte_carlo::{
    covariance_factor, covariance_matrix, integrate_prices, simulate_correlated_prices,
};
pub use risk::{cholesky_factor, simulate_portfolio_risk};
pub use sweep::{
    correlation_sweep, default_correlation_grid, CorrelationSweep, CorrelationSweepPoint,
    SweepInputs,
};
