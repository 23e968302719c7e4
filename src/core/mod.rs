//! Core types and utilities for RaptorRisk.

pub mod config;
pub mod error;
pub mod rng;
pub mod types;

pub use config::{
    AssetSimulationConfig, CorrelationSpec, ParameterBounds, ParameterRange, RepairConfig,
    RiskReturnConfig,
};
pub use error::{RaptorError, Result};
pub use rng::{par_trials, seeded_rng, stream_rng, TRIAL_CHUNK_SIZE};
pub use types::*;
