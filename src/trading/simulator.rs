//! Compounding trade-outcome simulation.
//!
//! Each simulated year holds a fixed number of wins (`floor(win_rate *
//! trades_per_year)`) in random order. Only the ordering varies between
//! trials, never the win count.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::config::{ensure_finite, ensure_in_range, ensure_positive_count};
use crate::core::error::Result;
use crate::core::rng::par_trials;

/// Trade-outcome simulator.
///
/// Immutable after construction. Parameter sweeps derive new instances with
/// [`TradingSimulator::with_win_rate`] or pass the win rate per call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradingSimulator {
    initial_aum: f64,
    win_rate: f64,
    trades_per_year: usize,
    risk_per_trade: f64,
}

impl TradingSimulator {
    /// Create a new simulator.
    ///
    /// # Arguments
    /// * `initial_aum` - Starting capital
    /// * `win_rate` - Fraction of winning trades (0-1)
    /// * `trades_per_year` - Trades in one simulated year
    /// * `risk_per_trade` - Fraction of current AUM risked per trade (0-1)
    pub fn new(
        initial_aum: f64,
        win_rate: f64,
        trades_per_year: usize,
        risk_per_trade: f64,
    ) -> Result<Self> {
        ensure_finite("initial_aum", initial_aum)?;
        ensure_in_range("win_rate", win_rate, 0.0, 1.0)?;
        ensure_positive_count("trades_per_year", trades_per_year)?;
        ensure_in_range("risk_per_trade", risk_per_trade, 0.0, 1.0)?;

        Ok(Self {
            initial_aum,
            win_rate,
            trades_per_year,
            risk_per_trade,
        })
    }

    /// Copy of this simulator with a different win rate.
    pub fn with_win_rate(&self, win_rate: f64) -> Result<Self> {
        Self::new(self.initial_aum, win_rate, self.trades_per_year, self.risk_per_trade)
    }

    #[inline]
    pub fn initial_aum(&self) -> f64 {
        self.initial_aum
    }

    #[inline]
    pub fn win_rate(&self) -> f64 {
        self.win_rate
    }

    #[inline]
    pub fn trades_per_year(&self) -> usize {
        self.trades_per_year
    }

    #[inline]
    pub fn risk_per_trade(&self) -> f64 {
        self.risk_per_trade
    }

    /// Apply one trade to `current_aum`.
    ///
    /// A win adds `risk * rpur`, a loss subtracts `risk`, where `risk` is
    /// `risk_per_trade * current_aum`. The result is not clamped.
    #[inline]
    pub fn simulate_trade(&self, current_aum: f64, is_win: bool, return_per_unit_risk: f64) -> f64 {
        let risk_amount = self.risk_per_trade * current_aum;
        if is_win {
            current_aum + risk_amount * return_per_unit_risk
        } else {
            current_aum - risk_amount
        }
    }

    /// Number of winning trades per year at `win_rate`.
    #[inline]
    pub fn win_count(&self, win_rate: f64) -> usize {
        ((win_rate * self.trades_per_year as f64).floor() as usize).min(self.trades_per_year)
    }

    /// Unshuffled outcome sequence: all wins first, then all losses.
    pub fn trade_outcomes(&self, win_rate: f64) -> Vec<bool> {
        let n_wins = self.win_count(win_rate);
        let mut outcomes = vec![false; self.trades_per_year];
        outcomes[..n_wins].fill(true);
        outcomes
    }

    fn run_trial<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        outcomes: &mut [bool],
        return_per_unit_risk: f64,
    ) -> f64 {
        outcomes.shuffle(rng);
        outcomes
            .iter()
            .fold(self.initial_aum, |aum, &is_win| self.simulate_trade(aum, is_win, return_per_unit_risk))
    }

    /// Simulate `num_simulations` independent years at the configured win
    /// rate and return the terminal AUM of each.
    pub fn simulate_year<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        return_per_unit_risk: f64,
        num_simulations: usize,
    ) -> Result<Vec<f64>> {
        self.simulate_year_with_win_rate(rng, self.win_rate, return_per_unit_risk, num_simulations)
    }

    /// Same as [`simulate_year`](Self::simulate_year) with an explicit win rate.
    pub fn simulate_year_with_win_rate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        win_rate: f64,
        return_per_unit_risk: f64,
        num_simulations: usize,
    ) -> Result<Vec<f64>> {
        ensure_in_range("win_rate", win_rate, 0.0, 1.0)?;
        ensure_finite("return_per_unit_risk", return_per_unit_risk)?;
        ensure_positive_count("num_simulations", num_simulations)?;

        debug!(
            win_rate,
            return_per_unit_risk, num_simulations, "simulating trade years"
        );

        let mut outcomes = self.trade_outcomes(win_rate);
        let results = (0..num_simulations)
            .map(|_| self.run_trial(rng, &mut outcomes, return_per_unit_risk))
            .collect();
        Ok(results)
    }

    /// Parallel year simulation driven by `seed`.
    ///
    /// Output is identical for a given seed regardless of thread count.
    pub fn simulate_year_par(
        &self,
        seed: u64,
        win_rate: f64,
        return_per_unit_risk: f64,
        num_simulations: usize,
    ) -> Result<Vec<f64>> {
        ensure_in_range("win_rate", win_rate, 0.0, 1.0)?;
        ensure_finite("return_per_unit_risk", return_per_unit_risk)?;
        ensure_positive_count("num_simulations", num_simulations)?;

        let template = self.trade_outcomes(win_rate);
        Ok(par_trials(seed, num_simulations, |rng| {
            let mut outcomes = template.clone();
            self.run_trial(rng, &mut outcomes, return_per_unit_risk)
        }))
    }

    /// Mean AUM after each trade across `num_simulations` years.
    ///
    /// The result has `trades_per_year + 1` points, starting at the
    /// initial AUM.
    pub fn average_trade_progression<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        win_rate: f64,
        return_per_unit_risk: f64,
        num_simulations: usize,
    ) -> Result<Vec<f64>> {
        ensure_in_range("win_rate", win_rate, 0.0, 1.0)?;
        ensure_finite("return_per_unit_risk", return_per_unit_risk)?;
        ensure_positive_count("num_simulations", num_simulations)?;

        let mut sums = vec![0.0; self.trades_per_year + 1];
        let mut outcomes = self.trade_outcomes(win_rate);

        for _ in 0..num_simulations {
            outcomes.shuffle(rng);
            let mut aum = self.initial_aum;
            sums[0] += aum;
            for (step, &is_win) in outcomes.iter().enumerate() {
                aum = self.simulate_trade(aum, is_win, return_per_unit_risk);
                sums[step + 1] += aum;
            }
        }

        let n = num_simulations as f64;
        Ok(sums.into_iter().map(|s| s / n).collect())
    }

    /// Terminal AUMs as percentage returns on the initial AUM.
    pub fn percentage_returns(&self, final_aums: &[f64]) -> Vec<f64> {
        final_aums
            .iter()
            .map(|aum| (aum / self.initial_aum - 1.0) * 100.0)
            .collect()
    }
}
