// In crates/strategies/src/lib.rs

use core_types::{Signal, Tick};
use execution::OrderHandler;

pub mod dip_buyer;
pub mod ema;
pub mod error;
pub mod factory;
pub mod types;

pub use error::{Error, Result};

/// The universal interface for a trading strategy.
///
/// A strategy reacts to one tick at a time and places its orders directly
/// through the handler it is given. It is a stateful entity: indicator values
/// carry over from one call to the next.
pub trait Strategy {
    /// The name of the strategy.
    fn name(&self) -> &'static str;

    /// Processes one tick to completion and returns the trade actions the
    /// handler accepted. Handler rejections are logged, never propagated.
    fn on_tick(&mut self, tick: &Tick, handler: &mut dyn OrderHandler) -> Vec<Signal>;
}
