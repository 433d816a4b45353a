// In crates/risk/src/fee_aware.rs

use crate::types::{ExitLevels, RiskSettings};
use crate::{Error, Result, RiskManager};
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// A risk manager with a fixed clip size, a per-symbol clip cap, and exit
/// levels grossed up for the fee charged on both legs of a round trip.
///
/// - break-even  = `buy × (1 + fee) / (1 − fee)`
/// - take-profit = `break-even × markup`
/// - stop-loss   = `buy × (1 − max_loss) × (1 − fee)`
#[derive(Debug, Clone)]
pub struct FeeAwareRiskManager {
    trade_volume: i64,
    max_held_volume: i64,
    fee_rate: Decimal,
    max_loss: Decimal,
    take_profit_markup: Decimal,
}

impl FeeAwareRiskManager {
    /// Creates a new `FeeAwareRiskManager`, validating and converting the settings.
    pub fn new(settings: &RiskSettings) -> Result<Self> {
        if settings.trade_volume <= 0 {
            return Err(Error::InvalidParameters(format!(
                "trade_volume must be positive, got {}",
                settings.trade_volume
            )));
        }

        let fee_rate = fraction("fee_rate", settings.fee_rate)?;
        let max_loss = fraction("max_loss_percent", settings.max_loss_percent)?;
        let take_profit_markup = to_decimal("take_profit_markup", settings.take_profit_markup)?;
        if take_profit_markup <= Decimal::ZERO {
            return Err(Error::InvalidParameters(format!(
                "take_profit_markup must be positive, got {}",
                settings.take_profit_markup
            )));
        }

        Ok(Self {
            trade_volume: settings.trade_volume,
            max_held_volume: i64::from(settings.max_positions_per_symbol) * settings.trade_volume,
            fee_rate,
            max_loss,
            take_profit_markup,
        })
    }
}

fn to_decimal(name: &str, value: f64) -> Result<Decimal> {
    Decimal::from_f64(value)
        .ok_or_else(|| Error::InvalidParameters(format!("{name} is not a finite number: {value}")))
}

/// Converts a value that must lie in `[0, 1)`.
fn fraction(name: &str, value: f64) -> Result<Decimal> {
    let d = to_decimal(name, value)?;
    if d < Decimal::ZERO || d >= dec!(1) {
        return Err(Error::InvalidParameters(format!(
            "{name} must be within [0, 1), got {value}"
        )));
    }
    Ok(d)
}

impl RiskManager for FeeAwareRiskManager {
    fn name(&self) -> &'static str {
        "FeeAwareRiskManager"
    }

    fn clip_size(&self) -> i64 {
        self.trade_volume
    }

    fn allows_entry(&self, held_volume: i64) -> bool {
        held_volume < self.max_held_volume
    }

    fn exit_levels(&self, buy_price: Decimal) -> ExitLevels {
        let one = dec!(1);
        let break_even = buy_price * (one + self.fee_rate) / (one - self.fee_rate);
        ExitLevels {
            break_even,
            take_profit: break_even * self.take_profit_markup,
            stop_loss: buy_price * (one - self.max_loss) * (one - self.fee_rate),
        }
    }
}
