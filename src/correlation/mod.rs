//! Correlation matrix construction and repair for RaptorRisk.

pub mod builder;
pub mod repair;

pub use builder::{build_correlation, build_random_correlation, build_uniform_correlation};
pub use repair::{
    is_positive_definite, min_eigenvalue, repair_to_positive_definite, repair_with_config,
};
