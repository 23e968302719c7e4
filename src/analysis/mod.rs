//! End-to-end workflows combining the simulation components.

pub mod assets;
pub mod risk_return;

pub use assets::{run_asset_simulation, AssetSimulationReport};
pub use risk_return::{run_risk_return_analysis, RiskReturnReport};
