//! Parameter sweeps over return-per-unit-risk and win rate.
//!
//! Every sweep point gets its own random stream, and the win rate travels
//! as an argument, so points run in parallel without shared state.

use rayon::prelude::*;
use tracing::info;

use super::simulator::TradingSimulator;
use crate::core::config::ParameterBounds;
use crate::core::error::Result;
use crate::core::rng::stream_rng;
use crate::core::types::SweepPoint;

/// Sixteen evenly spaced RPUR values from 0.5 to 8.0.
pub fn default_rpur_grid() -> Vec<f64> {
    linspace(0.5, 8.0, 16)
}

/// Win rates 28%, 30%, ..., 72%.
pub fn default_win_rate_grid() -> Vec<f64> {
    ParameterBounds::default().win_rate.values()
}

/// `n` evenly spaced values over `[start, end]`, both ends included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + i as f64 * step).collect()
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Mean percentage return for each RPUR value at the simulator's win rate.
pub fn rpur_sweep(
    simulator: &TradingSimulator,
    seed: u64,
    rpur_values: &[f64],
    num_simulations: usize,
) -> Result<Vec<SweepPoint>> {
    let points = rpur_values
        .par_iter()
        .enumerate()
        .map(|(idx, &rpur)| {
            let mut rng = stream_rng(seed, idx as u64);
            let finals = simulator.simulate_year(&mut rng, rpur, num_simulations)?;
            Ok(SweepPoint {
                parameter: rpur,
                mean_return_pct: mean(&simulator.percentage_returns(&finals)),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    info!(points = points.len(), "rpur sweep complete");
    Ok(points)
}

/// Mean percentage return for each win rate (in percent) at a fixed RPUR.
pub fn win_rate_sweep(
    simulator: &TradingSimulator,
    seed: u64,
    win_rates_pct: &[f64],
    return_per_unit_risk: f64,
    num_simulations: usize,
) -> Result<Vec<SweepPoint>> {
    let points = win_rates_pct
        .par_iter()
        .enumerate()
        .map(|(idx, &win_rate_pct)| {
            let mut rng = stream_rng(seed, idx as u64);
            let finals = simulator.simulate_year_with_win_rate(
                &mut rng,
                win_rate_pct / 100.0,
                return_per_unit_risk,
                num_simulations,
            )?;
            Ok(SweepPoint {
                parameter: win_rate_pct,
                mean_return_pct: mean(&simulator.percentage_returns(&finals)),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    info!(points = points.len(), "win rate sweep complete");
    Ok(points)
}

/// Linearly interpolate a sweep at `x`, clamping outside the grid.
///
/// Points must be sorted by parameter.
pub fn interpolate(points: &[SweepPoint], x: f64) -> Option<f64> {
    let first = points.first()?;
    let last = points.last()?;
    if x <= first.parameter {
        return Some(first.mean_return_pct);
    }
    if x >= last.parameter {
        return Some(last.mean_return_pct);
    }

    points.windows(2).find_map(|w| {
        let (a, b) = (w[0], w[1]);
        if x >= a.parameter && x <= b.parameter {
            let span = b.parameter - a.parameter;
            if span == 0.0 {
                return Some(a.mean_return_pct);
            }
            let t = (x - a.parameter) / span;
            Some(a.mean_return_pct + t * (b.mean_return_pct - a.mean_return_pct))
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace() {
        let grid = default_rpur_grid();
        assert_eq!(grid.len(), 16);
        assert!((grid[0] - 0.5).abs() < 1e-12);
        assert!((grid[1] - 1.0).abs() < 1e-12);
        assert!((grid[15] - 8.0).abs() < 1e-12);
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);
    }

    #[test]
    fn test_win_rate_grid() {
        let grid = default_win_rate_grid();
        assert_eq!(grid.len(), 23);
        assert!((grid[1] - 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_rpur_sweep_monotonic() {
        // Order does not change a fixed-composition year, so each point is exact.
        let sim = TradingSimulator::new(100_000.0, 0.4, 30, 0.01).unwrap();
        let points = rpur_sweep(&sim, 42, &[1.0, 2.0, 4.0], 50).unwrap();
        assert_eq!(points.len(), 3);
        assert!(points[0].mean_return_pct < points[1].mean_return_pct);
        assert!(points[1].mean_return_pct < points[2].mean_return_pct);

        let expected = (1.02f64.powi(12) * 0.99f64.powi(18) - 1.0) * 100.0;
        assert!((points[1].mean_return_pct - expected).abs() < 1e-6);
    }

    #[test]
    fn test_win_rate_sweep_uses_explicit_rate() {
        let sim = TradingSimulator::new(100_000.0, 0.5, 10, 0.01).unwrap();
        let points = win_rate_sweep(&sim, 1, &[0.0, 100.0], 1.0, 10).unwrap();
        assert!((points[0].mean_return_pct - (0.99f64.powi(10) - 1.0) * 100.0).abs() < 1e-6);
        assert!((points[1].mean_return_pct - (1.01f64.powi(10) - 1.0) * 100.0).abs() < 1e-6);
        // Simulator itself is untouched.
        assert!((sim.win_rate() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_interpolate() {
        let points = vec![
            SweepPoint { parameter: 30.0, mean_return_pct: 0.0 },
            SweepPoint { parameter: 32.0, mean_return_pct: 10.0 },
        ];
        assert!((interpolate(&points, 31.0).unwrap() - 5.0).abs() < 1e-12);
        assert!((interpolate(&points, 10.0).unwrap() - 0.0).abs() < 1e-12);
        assert!((interpolate(&points, 40.0).unwrap() - 10.0).abs() < 1e-12);
        assert!(interpolate(&[], 1.0).is_none());
    }
}
