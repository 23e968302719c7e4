//! Performance metrics for RaptorRisk.

pub mod drawdown;
pub mod performance;
pub mod streaming;

pub use drawdown::{calmar_ratio, drawdown_curve, max_drawdown};
pub use performance::{compute_metrics, metrics_table, portfolio_returns};
pub use streaming::ReturnStats;
