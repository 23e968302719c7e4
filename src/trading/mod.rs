//! Trade-outcome simulation for RaptorRisk.

pub mod drawdown;
pub mod simulator;
pub mod sweep;

pub use drawdown::{
    max_consecutive_losses, simulate_drawdown, simulate_drawdown_par, worst_case_drawdown,
};
pub use simulator::TradingSimulator;
pub use sweep::{
    default_rpur_grid, default_win_rate_grid, interpolate, linspace, rpur_sweep, win_rate_sweep,
};
