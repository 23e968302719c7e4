//! Consecutive-loss drawdown estimation.
//!
//! Drawdown here is the longest losing streak times the risk per trade, a
//! proxy for worst-case consecutive drawdown rather than a true
//! peak-to-trough measure.

use rand::Rng;
use tracing::debug;

use crate::core::config::{ensure_finite, ensure_in_range, ensure_positive_count};
use crate::core::error::Result;
use crate::core::rng::par_trials;

/// Length of the longest run of losing (`false`) trades.
pub fn max_consecutive_losses(outcomes: &[bool]) -> usize {
    let mut max_streak = 0;
    let mut current_streak = 0;

    for &is_win in outcomes {
        if is_win {
            current_streak = 0;
        } else {
            current_streak += 1;
            if current_streak > max_streak {
                max_streak = current_streak;
            }
        }
    }

    max_streak
}

/// Drawdown if every losing trade of the year came back-to-back.
///
/// All arguments use the same percentage units as
/// [`simulate_drawdown`]; the result is in percent.
pub fn worst_case_drawdown(win_rate_pct: f64, trades_per_year: usize, risk_per_trade_pct: f64) -> f64 {
    trades_per_year as f64 * (1.0 - win_rate_pct / 100.0) * risk_per_trade_pct
}

fn validate(
    win_rate_pct: f64,
    trades_per_year: usize,
    risk_per_trade_pct: f64,
    simulations: usize,
) -> Result<()> {
    ensure_in_range("win_rate_pct", win_rate_pct, 0.0, 100.0)?;
    ensure_positive_count("trades_per_year", trades_per_year)?;
    ensure_finite("risk_per_trade_pct", risk_per_trade_pct)?;
    ensure_positive_count("simulations", simulations)?;
    Ok(())
}

/// Longest losing streak of one year of independently drawn trades.
fn sample_streak<R: Rng + ?Sized>(rng: &mut R, p_win: f64, trades_per_year: usize) -> usize {
    let outcomes: Vec<bool> = (0..trades_per_year).map(|_| rng.gen_bool(p_win)).collect();
    max_consecutive_losses(&outcomes)
}

/// Estimate the expected consecutive-loss drawdown.
///
/// Unlike the year simulation, each trade is an independent Bernoulli draw,
/// so the number of losses varies between trials.
///
/// # Arguments
/// * `win_rate_pct` - Win rate in percent (0-100)
/// * `trades_per_year` - Trades per simulated year
/// * `risk_per_trade_pct` - Risk per trade in percent
/// * `simulations` - Number of trials
///
/// # Returns
/// Mean drawdown across trials, in percent
pub fn simulate_drawdown<R: Rng + ?Sized>(
    rng: &mut R,
    win_rate_pct: f64,
    trades_per_year: usize,
    risk_per_trade_pct: f64,
    simulations: usize,
) -> Result<f64> {
    validate(win_rate_pct, trades_per_year, risk_per_trade_pct, simulations)?;
    debug!(win_rate_pct, trades_per_year, risk_per_trade_pct, simulations, "simulating drawdown");

    let p_win = win_rate_pct / 100.0;
    let total: f64 = (0..simulations)
        .map(|_| sample_streak(rng, p_win, trades_per_year) as f64 * risk_per_trade_pct)
        .sum();

    Ok(total / simulations as f64)
}

/// Parallel [`simulate_drawdown`] driven by `seed`.
pub fn simulate_drawdown_par(
    seed: u64,
    win_rate_pct: f64,
    trades_per_year: usize,
    risk_per_trade_pct: f64,
    simulations: usize,
) -> Result<f64> {
    validate(win_rate_pct, trades_per_year, risk_per_trade_pct, simulations)?;

    let p_win = win_rate_pct / 100.0;
    let drawdowns = par_trials(seed, simulations, |rng| {
        sample_streak(rng, p_win, trades_per_year) as f64 * risk_per_trade_pct
    });

    Ok(drawdowns.iter().sum::<f64>() / simulations as f64)
}
