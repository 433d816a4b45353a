// In crates/risk/src/types.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Position sizing and exit tunables, as read from configuration.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RiskSettings {
    /// How many clips of one symbol may be held at once.
    #[serde(default = "default_max_positions")]
    pub max_positions_per_symbol: u32,

    /// Shares per order. Every buy and every sell uses this size.
    #[serde(default = "default_trade_volume")]
    pub trade_volume: i64,

    /// Fee charged on each leg of a round trip (e.g., 0.00168 for 0.168%).
    #[serde(default = "default_fee_rate")]
    pub fee_rate: f64,

    /// Loss tolerated below the buy price before cutting a lot.
    #[serde(default = "default_max_loss_percent")]
    pub max_loss_percent: f64,

    /// Multiplier applied to the break-even price to get the take-profit price.
    #[serde(default = "default_take_profit_markup")]
    pub take_profit_markup: f64,
}

impl Default for RiskSettings {
    fn default() -> Self {
        Self {
            max_positions_per_symbol: default_max_positions(),
            trade_volume: default_trade_volume(),
            fee_rate: default_fee_rate(),
            max_loss_percent: default_max_loss_percent(),
            take_profit_markup: default_take_profit_markup(),
        }
    }
}

fn default_max_positions() -> u32 { 5 }
fn default_trade_volume() -> i64 { 100 }
// Commission 0.157% plus 7% VAT.
fn default_fee_rate() -> f64 { 0.00157 * 1.07 }
fn default_max_loss_percent() -> f64 { 0.025 }
fn default_take_profit_markup() -> f64 { 1.0025 }

/// Price levels at which a lot should be closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitLevels {
    /// Sell price at which round-trip fees are exactly covered.
    pub break_even: Decimal,
    pub take_profit: Decimal,
    pub stop_loss: Decimal,
}

/// Which exit rule a price triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDecision {
    TakeProfit,
    StopLoss,
}
