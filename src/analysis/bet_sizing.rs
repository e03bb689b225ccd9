//! Score-to-bet-size strategies.

use crate::domain::Symbol;

pub trait BetSizer: Send + Sync {
    /// Amount to stake on `symbol` given the account `balance` and a
    /// recommendation factor in [0, 1].
    fn bet_value(&self, symbol: &Symbol, balance: f64, factor: f64) -> f64;
}

/// Stakes `balance * factor`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProportionalBet;

impl BetSizer for ProportionalBet {
    fn bet_value(&self, _symbol: &Symbol, balance: f64, factor: f64) -> f64 {
        balance * factor
    }
}

// Any closure with the right shape works as a strategy.
impl<F> BetSizer for F
where
    F: Fn(&Symbol, f64, f64) -> f64 + Send + Sync,
{
    fn bet_value(&self, symbol: &Symbol, balance: f64, factor: f64) -> f64 {
        self(symbol, balance, factor)
    }
}
