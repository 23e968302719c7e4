//! Trade-outcome workflow: terminal AUM distribution, drawdown and sweeps.

use serde::Serialize;
use tracing::info;

use crate::core::config::RiskReturnConfig;
use crate::core::error::Result;
use crate::core::rng::stream_rng;
use crate::core::types::SweepPoint;
use crate::trading::{
    default_rpur_grid, default_win_rate_grid, interpolate, rpur_sweep, simulate_drawdown_par,
    win_rate_sweep, worst_case_drawdown, TradingSimulator,
};

/// Sub-seed offsets so each stage draws from unrelated streams.
const PROGRESSION_SEED: u64 = 1;
const DRAWDOWN_SEED: u64 = 2;
const RPUR_SWEEP_SEED: u64 = 3;
const WIN_RATE_SWEEP_SEED: u64 = 4;

/// Everything the trade-outcome view displays.
#[derive(Debug, Clone, Serialize)]
pub struct RiskReturnReport {
    /// Terminal AUM of every trial.
    pub final_aums: Vec<f64>,
    /// Terminal returns in percent, one per trial.
    pub returns_pct: Vec<f64>,
    pub mean_final_aum: f64,
    pub mean_return_pct: f64,
    /// Mean AUM after each trade, starting at the initial AUM.
    pub progression: Vec<f64>,
    /// Expected longest losing streak times risk, in percent.
    pub expected_drawdown_pct: f64,
    /// Every loss back-to-back, in percent.
    pub worst_case_drawdown_pct: f64,
    pub rpur_sweep: Vec<SweepPoint>,
    pub win_rate_sweep: Vec<SweepPoint>,
    /// Win-rate sweep read off at the configured win rate, in percent.
    pub expected_return_pct: Option<f64>,
}

/// Run the full trade-outcome workflow for `config`.
pub fn run_risk_return_analysis(config: &RiskReturnConfig) -> Result<RiskReturnReport> {
    config.validate()?;

    let simulator = TradingSimulator::new(
        config.initial_aum,
        config.win_rate(),
        config.trades_per_year,
        config.risk_per_trade(),
    )?;
    let seed = config.seed;

    let final_aums = simulator.simulate_year_par(
        seed,
        config.win_rate(),
        config.return_per_unit_risk,
        config.num_simulations,
    )?;
    let returns_pct = simulator.percentage_returns(&final_aums);
    let n = final_aums.len() as f64;
    let mean_final_aum = final_aums.iter().sum::<f64>() / n;
    let mean_return_pct = returns_pct.iter().sum::<f64>() / n;

    let mut rng = stream_rng(seed, PROGRESSION_SEED);
    let progression = simulator.average_trade_progression(
        &mut rng,
        config.win_rate(),
        config.return_per_unit_risk,
        config.num_simulations,
    )?;

    let expected_drawdown_pct = simulate_drawdown_par(
        seed.wrapping_add(DRAWDOWN_SEED),
        config.win_rate_pct,
        config.trades_per_year,
        config.risk_per_trade_pct,
        config.drawdown_simulations,
    )?;
    let worst_case_drawdown_pct = worst_case_drawdown(
        config.win_rate_pct,
        config.trades_per_year,
        config.risk_per_trade_pct,
    );

    let rpur_sweep = rpur_sweep(
        &simulator,
        seed.wrapping_add(RPUR_SWEEP_SEED),
        &default_rpur_grid(),
        config.num_simulations,
    )?;
    let win_rate_sweep = win_rate_sweep(
        &simulator,
        seed.wrapping_add(WIN_RATE_SWEEP_SEED),
        &default_win_rate_grid(),
        config.return_per_unit_risk,
        config.num_simulations,
    )?;

    let expected_return_pct = interpolate(&win_rate_sweep, config.win_rate_pct);

    info!(
        mean_final_aum,
        expected_drawdown_pct, worst_case_drawdown_pct, "risk/return analysis complete"
    );

    Ok(RiskReturnReport {
        final_aums,
        returns_pct,
        mean_final_aum,
        mean_return_pct,
        progression,
        expected_drawdown_pct,
        worst_case_drawdown_pct,
        rpur_sweep,
        win_rate_sweep,
        expected_return_pct,
    })
}
