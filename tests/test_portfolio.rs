//! Integration tests for correlated price simulation and metrics.

use raptorrisk::core::config::{AssetSimulationConfig, CorrelationSpec};
use raptorrisk::core::rng::seeded_rng;
use raptorrisk::correlation::build_uniform_correlation;
use raptorrisk::metrics::{compute_metrics, metrics_table};
use raptorrisk::portfolio::{simulate_correlated_prices, simulate_portfolio_risk};
use raptorrisk::run_asset_simulation;

#[test]
fn test_perfect_correlation_moves_together() {
    let mut rng = seeded_rng(42);
    let corr = build_uniform_correlation(2, 1.0).unwrap();
    let mean = [0.001, 0.0005];
    let vol = [0.01, 0.02];
    let (paths, log_returns) =
        simulate_correlated_prices(&mut rng, 2, &corr, &mean, &vol, 500).unwrap();

    let drift: Vec<f64> = (0..2).map(|i| mean[i] - 0.5 * vol[i] * vol[i]).collect();
    for t in 0..500 {
        let z0 = (log_returns[(t, 0)] - drift[0]) / vol[0];
        let z1 = (log_returns[(t, 1)] - drift[1]) / vol[1];
        assert!((z0 - z1).abs() < 1e-6, "day {}: {} vs {}", t, z0, z1);
    }
    assert_eq!(paths.len(), 500);
}

#[test]
fn test_log_return_moments() {
    let mut rng = seeded_rng(7);
    let corr = build_uniform_correlation(3, 0.5).unwrap();
    let (_, log_returns) =
        simulate_correlated_prices(&mut rng, 3, &corr, &[0.0; 3], &[0.01; 3], 20_000).unwrap();

    let col0 = log_returns.column(0);
    let col1 = log_returns.column(1);
    let m0 = col0.mean();
    let m1 = col1.mean();
    let n = col0.len() as f64;
    let cov = col0.iter().zip(col1.iter()).map(|(a, b)| (a - m0) * (b - m1)).sum::<f64>() / n;
    let v0 = col0.iter().map(|a| (a - m0).powi(2)).sum::<f64>() / n;
    let v1 = col1.iter().map(|b| (b - m1).powi(2)).sum::<f64>() / n;

    assert!((cov / (v0 * v1).sqrt() - 0.5).abs() < 0.03);
    assert!((v0.sqrt() - 0.01).abs() < 0.0005);
}

#[test]
fn test_rising_series_metrics() {
    let prices: Vec<f64> = (0..100).map(|i| 100.0 + i as f64).collect();
    let returns: Vec<f64> = prices.windows(2).map(|w| (w[1] / w[0]).ln()).collect();
    let m = compute_metrics(&prices, &returns, 100.0 / 252.0, 0.0).unwrap();

    assert_eq!(m.max_drawdown, 0.0);
    assert!(m.sortino.is_none());
    assert!(m.sortino_or_nan().is_nan());
    assert!(m.calmar.is_none());
    assert!(m.sharpe.unwrap() > 0.0);
}

#[test]
fn test_metrics_table_from_simulation() {
    let mut rng = seeded_rng(3);
    let corr = build_uniform_correlation(3, 0.2).unwrap();
    let (paths, log_returns) =
        simulate_correlated_prices(&mut rng, 3, &corr, &[0.0004; 3], &[0.0126; 3], 504).unwrap();
    let table = metrics_table(&paths, &log_returns, 2.0, 0.02).unwrap();

    assert_eq!(table.len(), 4);
    assert_eq!(table[3].label, "Portfolio");
    for row in &table {
        assert!(row.metrics.max_drawdown >= 0.0 && row.metrics.max_drawdown < 1.0);
        assert!(row.metrics.annualized_volatility > 0.0);
    }
}

#[test]
fn test_diversification_risk_grows_with_correlation() {
    let mut rng = seeded_rng(11);
    let low = simulate_portfolio_risk(&mut rng, 8, 0.1, 100).unwrap();
    let high = simulate_portfolio_risk(&mut rng, 8, 0.9, 100).unwrap();
    assert!(low < high);
    assert!(simulate_portfolio_risk(&mut rng, 4, -0.5, 10).is_err());
}

#[test]
fn test_asset_workflow_is_reproducible() {
    let config = AssetSimulationConfig {
        num_assets: 3,
        num_years: 1,
        correlation: CorrelationSpec::Range { min: -0.3, max: 0.8 },
        ..AssetSimulationConfig::default()
    };
    let a = run_asset_simulation(&config).unwrap();
    let b = run_asset_simulation(&config).unwrap();
    assert_eq!(a.paths.portfolio, b.paths.portfolio);
    assert_eq!(a.metrics, b.metrics);
    assert_eq!(a.sweep.points.len(), 11);
}
