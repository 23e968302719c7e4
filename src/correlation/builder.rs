//! Correlation matrix construction.

use nalgebra::DMatrix;
use rand::distributions::{Distribution, Uniform};
use rand::Rng;

use crate::core::config::{ensure_in_range, ensure_positive_count, CorrelationSpec};
use crate::core::error::Result;
use crate::core::types::CorrelationMatrix;

/// Matrix with unit diagonal and `corr` everywhere else.
pub fn build_uniform_correlation(n: usize, corr: f64) -> Result<CorrelationMatrix> {
    ensure_positive_count("num_assets", n)?;
    ensure_in_range("correlation", corr, -1.0, 1.0)?;

    Ok(DMatrix::from_fn(n, n, |i, j| if i == j { 1.0 } else { corr }))
}

/// Symmetrized random matrix with entries drawn from `[min_corr, max_corr]`.
///
/// The result has a unit diagonal but is not guaranteed to be positive
/// semidefinite; see [`repair_to_positive_definite`](super::repair_to_positive_definite).
pub fn build_random_correlation<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    min_corr: f64,
    max_corr: f64,
) -> Result<CorrelationMatrix> {
    ensure_positive_count("num_assets", n)?;
    CorrelationSpec::Range {
        min: min_corr,
        max: max_corr,
    }
    .validate()?;

    let dist = Uniform::new_inclusive(min_corr, max_corr);
    let raw = DMatrix::from_fn(n, n, |_, _| dist.sample(rng));

    let mut corr = (&raw + raw.transpose()) * 0.5;
    corr.fill_diagonal(1.0);
    Ok(corr)
}

/// Build the raw (unrepaired) matrix described by `spec`.
pub fn build_correlation<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    spec: &CorrelationSpec,
) -> Result<CorrelationMatrix> {
    match *spec {
        CorrelationSpec::Uniform { correlation } => build_uniform_correlation(n, correlation),
        CorrelationSpec::Range { min, max } => build_random_correlation(rng, n, min, max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::RaptorError;
    use crate::core::rng::seeded_rng;

    #[test]
    fn test_uniform_layout() {
        let m = build_uniform_correlation(4, 0.3).unwrap();
        assert_eq!(m.shape(), (4, 4));
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { 1.0 } else { 0.3 };
                assert_eq!(m[(i, j)], expected);
            }
        }
    }

    #[test]
    fn test_uniform_rejects_bad_input() {
        assert!(build_uniform_correlation(0, 0.3).is_err());
        assert!(build_uniform_correlation(3, 1.5).is_err());
    }

    #[test]
    fn test_random_symmetric_in_range() {
        let mut rng = seeded_rng(42);
        let m = build_random_correlation(&mut rng, 6, -0.2, 0.6).unwrap();
        for i in 0..6 {
            assert_eq!(m[(i, i)], 1.0);
            for j in 0..6 {
                assert_eq!(m[(i, j)], m[(j, i)]);
                if i != j {
                    assert!(m[(i, j)] >= -0.2 && m[(i, j)] <= 0.6);
                }
            }
        }
    }

    #[test]
    fn test_random_degenerate_range() {
        let mut rng = seeded_rng(42);
        let m = build_random_correlation(&mut rng, 3, 0.5, 0.5).unwrap();
        assert_eq!(m[(0, 1)], 0.5);
    }

    #[test]
    fn test_random_rejects_inverted_range() {
        let mut rng = seeded_rng(42);
        let err = build_random_correlation(&mut rng, 3, 0.6, -0.2).unwrap_err();
        assert!(matches!(err, RaptorError::InvalidConfig { .. }));
    }
}
