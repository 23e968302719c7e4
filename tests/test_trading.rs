//! Integration tests for trade-outcome simulation and drawdown estimation.

use raptorrisk::core::rng::seeded_rng;
use raptorrisk::trading::{
    rpur_sweep, simulate_drawdown, simulate_drawdown_par, worst_case_drawdown, TradingSimulator,
};

#[test]
fn test_all_wins_compound_identically() {
    let sim = TradingSimulator::new(100_000.0, 1.0, 25, 0.02).unwrap();
    let mut rng = seeded_rng(1);
    let finals = sim.simulate_year(&mut rng, 2.5, 200).unwrap();

    let expected = 100_000.0 * (1.0 + 0.02 * 2.5f64).powi(25);
    assert_eq!(finals.len(), 200);
    for aum in finals {
        assert!((aum - expected).abs() < 1e-6);
    }
}

#[test]
fn test_all_losses_compound_identically() {
    let sim = TradingSimulator::new(50_000.0, 0.0, 40, 0.01).unwrap();
    let mut rng = seeded_rng(2);
    let finals = sim.simulate_year(&mut rng, 3.0, 100).unwrap();

    let expected = 50_000.0 * 0.99f64.powi(40);
    for aum in finals {
        assert!((aum - expected).abs() < 1e-6);
    }
}

#[test]
fn test_reference_scenario_mean_terminal_aum() {
    let sim = TradingSimulator::new(100_000.0, 0.5, 20, 0.01).unwrap();
    let mut rng = seeded_rng(42);
    let finals = sim.simulate_year(&mut rng, 3.0, 5_000).unwrap();

    let mean = finals.iter().sum::<f64>() / finals.len() as f64;
    assert!(mean > 110_000.0 && mean < 135_000.0, "mean = {}", mean);
}

#[test]
fn test_parallel_matches_closed_form() {
    let sim = TradingSimulator::new(100_000.0, 0.5, 20, 0.01).unwrap();
    let finals = sim.simulate_year_par(9, 0.5, 3.0, 3_000).unwrap();

    let expected = 100_000.0 * 1.03f64.powi(10) * 0.99f64.powi(10);
    assert_eq!(finals.len(), 3_000);
    assert!(finals.iter().all(|a| (a - expected).abs() < 1e-6));
}

#[test]
fn test_drawdown_edge_cases() {
    let mut rng = seeded_rng(5);
    assert_eq!(simulate_drawdown(&mut rng, 100.0, 30, 1.5, 500).unwrap(), 0.0);
    assert!((simulate_drawdown(&mut rng, 0.0, 30, 1.5, 500).unwrap() - 45.0).abs() < 1e-9);

    assert_eq!(simulate_drawdown_par(5, 100.0, 30, 1.5, 500).unwrap(), 0.0);
    assert!((simulate_drawdown_par(5, 0.0, 30, 1.5, 500).unwrap() - 45.0).abs() < 1e-9);
}

#[test]
fn test_expected_drawdown_below_worst_case() {
    let expected = simulate_drawdown_par(42, 40.0, 30, 1.0, 5_000).unwrap();
    let worst = worst_case_drawdown(40.0, 30, 1.0);
    assert!((worst - 18.0).abs() < 1e-9);
    assert!(expected > 0.0 && expected < worst);
}

#[test]
fn test_rpur_sweep_is_increasing() {
    let sim = TradingSimulator::new(100_000.0, 0.4, 30, 0.01).unwrap();
    let points = rpur_sweep(&sim, 3, &[1.0, 2.0, 4.0], 200).unwrap();
    assert_eq!(points.len(), 3);
    assert!(points[0].mean_return_pct < points[1].mean_return_pct);
    assert!(points[1].mean_return_pct < points[2].mean_return_pct);
}

#[test]
fn test_invalid_inputs_rejected() {
    assert!(TradingSimulator::new(100_000.0, 0.5, 0, 0.01).is_err());
    assert!(TradingSimulator::new(100_000.0, 1.5, 10, 0.01).is_err());

    let sim = TradingSimulator::new(100_000.0, 0.5, 10, 0.01).unwrap();
    let mut rng = seeded_rng(0);
    assert!(sim.simulate_year(&mut rng, 3.0, 0).is_err());
    assert!(simulate_drawdown(&mut rng, 120.0, 10, 1.0, 10).is_err());
}
