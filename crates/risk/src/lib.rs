// In crates/risk/src/lib.rs

use rust_decimal::Decimal;

pub mod error;
pub mod fee_aware;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use fee_aware::FeeAwareRiskManager;
pub use types::{ExitDecision, ExitLevels, RiskSettings};

/// The universal interface for a risk management module.
///
/// A `RiskManager` decides how large each order is, whether another entry is
/// allowed for a symbol, and at which prices a held lot must be closed.
pub trait RiskManager {
    /// The name of the risk management strategy.
    fn name(&self) -> &'static str;

    /// Shares per order.
    fn clip_size(&self) -> i64;

    /// Whether a new clip may be bought while `held_volume` shares are held.
    fn allows_entry(&self, held_volume: i64) -> bool;

    /// Computes the exit price levels for a lot bought at `buy_price`.
    fn exit_levels(&self, buy_price: Decimal) -> ExitLevels;

    /// Checks `price` against the exit levels of a lot bought at `buy_price`.
    ///
    /// Take-profit wins when both could apply. Both comparisons are strict:
    /// a price sitting exactly on a level triggers nothing.
    fn evaluate_exit(&self, price: Decimal, buy_price: Decimal) -> Option<ExitDecision> {
        let levels = self.exit_levels(buy_price);
        if price > levels.take_profit {
            Some(ExitDecision::TakeProfit)
        } else if price < levels.stop_loss {
            Some(ExitDecision::StopLoss)
        } else {
            None
        }
    }
}
