// In crates/execution/src/lib.rs

use core_types::{Lot, OrderAck, Side, Symbol, Tick};
use rust_decimal::Decimal;

pub mod error;
pub mod paper;

// Re-export public types
pub use error::{Error, Result};
pub use paper::PaperHandler;

/// The universal interface for an order and portfolio handler.
///
/// A handler places orders and answers what is currently held. Every call is
/// synchronous and its answers are treated as ground truth by strategies.
/// Rejections come back as `Err` and must never panic.
pub trait OrderHandler {
    /// The name of the handler (e.g., "PaperHandler").
    fn name(&self) -> &'static str;

    /// Called with every tick before the strategy sees it.
    fn on_market_data(&mut self, _tick: &Tick) {}

    /// Total volume held across all lots of `symbol`.
    fn total_volume(&self, symbol: &Symbol) -> i64;

    /// Every held lot of `symbol`, oldest first. Empty when nothing is held.
    fn lots(&self, symbol: &Symbol) -> Vec<Lot>;

    /// Whether at least `volume` shares of `symbol` are held.
    fn has_volume(&self, symbol: &Symbol, volume: i64) -> bool {
        self.total_volume(symbol) >= volume
    }

    /// Places an order executable only at `limit_price` or better.
    fn create_order_to_limit(
        &mut self,
        volume: i64,
        limit_price: Decimal,
        side: Side,
        symbol: &Symbol,
    ) -> Result<OrderAck>;

    /// Places an order executable immediately at the best available price.
    fn create_order_at_market(&mut self, volume: i64, side: Side, symbol: &Symbol) -> Result<OrderAck>;
}
