// In crates/engine/src/lib.rs

pub mod feed;

use anyhow::Result;
use core_types::{Signal, Tick};
use execution::OrderHandler;
use strategies::Strategy;

/// Counters accumulated over a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks handed to the strategy.
    pub ticks: u64,
    /// Feed rows that could not be decoded.
    pub skipped: u64,
    pub buys: u64,
    pub take_profits: u64,
    pub stop_losses: u64,
}

impl RunSummary {
    fn record(&mut self, signals: &[Signal]) {
        for signal in signals {
            match signal {
                Signal::Buy { .. } => self.buys += 1,
                Signal::TakeProfit { .. } => self.take_profits += 1,
                Signal::StopLoss { .. } => self.stop_losses += 1,
            }
        }
    }
}

/// Drives one strategy against one order handler, one tick at a time.
///
/// Each tick is processed to completion before the next one is read. Nothing
/// a single tick does can stop the loop.
pub struct Engine<H: OrderHandler> {
    strategy: Box<dyn Strategy + Send + Sync>,
    handler: H,
    summary: RunSummary,
}

impl<H: OrderHandler> Engine<H> {
    pub fn new(strategy: Box<dyn Strategy + Send + Sync>, handler: H) -> Self {
        tracing::info!(
            strategy = strategy.name(),
            handler = handler.name(),
            "Engine initialised."
        );
        Self {
            strategy,
            handler,
            summary: RunSummary::default(),
        }
    }

    /// Feeds one tick to the handler and then the strategy.
    pub fn on_tick(&mut self, tick: &Tick) -> Vec<Signal> {
        self.handler.on_market_data(tick);
        let signals = self.strategy.on_tick(tick, &mut self.handler);
        self.summary.ticks += 1;
        self.summary.record(&signals);
        signals
    }

    /// Processes every tick of `ticks`. Rows that failed to decode are logged
    /// and skipped.
    pub fn run<I>(&mut self, ticks: I) -> RunSummary
    where
        I: IntoIterator<Item = Result<Tick>>,
    {
        tracing::info!(strategy = self.strategy.name(), "Starting tick replay.");

        for row in ticks {
            match row {
                Ok(tick) => {
                    self.on_tick(&tick);
                }
                Err(e) => {
                    self.summary.skipped += 1;
                    tracing::warn!(error = %e, "Skipping malformed tick.");
                }
            }
        }

        tracing::info!(summary = ?self.summary, "Tick replay finished.");
        self.summary
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::ticks_from_reader;
    use core_types::Symbol;
    use execution::PaperHandler;
    use rust_decimal_macros::dec;
    use strategies::dip_buyer::DipBuyer;
    use strategies::types::DipBuyerSettings;
    use tempfile::tempdir;
    use tracker::PositionTracker;

    fn engine(dir: &std::path::Path) -> Engine<PaperHandler> {
        let strategy = DipBuyer::new(DipBuyerSettings {
            symbols: vec!["PTT".into()],
            ..DipBuyerSettings::default()
        })
        .unwrap();
        let ledger = PositionTracker::open(dir, "team", "engine").unwrap();
        Engine::new(Box::new(strategy), PaperHandler::new(ledger))
    }

    #[test]
    fn dip_then_rebound_buys_and_takes_profit() {
        let dir = tempdir().unwrap();
        let mut engine = engine(dir.path());

        engine.on_tick(&Tick::new("PTT", dec!(100)));
        assert_eq!(engine.on_tick(&Tick::new("PTT", dec!(90))), vec![Signal::Buy { price: dec!(90) }]);

        // 91 is still a dip against an EMA of 96.6, and clears the 90 lot's take-profit.
        let signals = engine.on_tick(&Tick::new("PTT", dec!(91)));
        assert_eq!(
            signals,
            vec![
                Signal::Buy { price: dec!(91) },
                Signal::TakeProfit { price: dec!(91), buy_price: dec!(90) },
            ]
        );

        let ledger = engine.handler().ledger();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.positions().next().map(|lot| lot.buy_price), Some(dec!(91)));
        assert_eq!(
            *engine.summary(),
            RunSummary { ticks: 3, skipped: 0, buys: 2, take_profits: 1, stop_losses: 0 }
        );
    }

    #[test]
    fn run_skips_malformed_rows_and_untracked_symbols() {
        let dir = tempdir().unwrap();
        let mut engine = engine(dir.path());
        let feed = "ShareCode,LastPrice\nPTT,100\nPTT,oops\nBBL,150\nPTT,90\n";

        let summary = engine.run(ticks_from_reader(feed.as_bytes()));

        assert_eq!(summary.ticks, 3);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.buys, 1);
        assert_eq!(engine.handler().ledger().total_volume(&Symbol::from("BBL")), 0);
    }

    #[test]
    fn ledger_carries_positions_into_the_next_session() {
        let dir = tempdir().unwrap();
        {
            let mut first = engine(dir.path());
            first.on_tick(&Tick::new("PTT", dec!(100)));
            first.on_tick(&Tick::new("PTT", dec!(90)).at("2025-01-06 10:00:00"));
        }

        // A fresh session seeds its EMA at 80, so no dip buy, but the
        // restored 90 lot is below its stop-loss.
        let mut second = engine(dir.path());
        let signals = second.on_tick(&Tick::new("PTT", dec!(80)));

        assert_eq!(
            signals,
            vec![Signal::StopLoss { price: dec!(80), buy_price: dec!(90) }]
        );
        assert!(second.into_handler().ledger().is_empty());
    }

    #[test]
    fn exits_close_the_oldest_lot_not_the_triggering_one() {
        let dir = tempdir().unwrap();
        let mut ledger = PositionTracker::open(dir.path(), "team", "engine").unwrap();
        ledger.add_position(Symbol::from("PTT"), dec!(33.5), 100, "t0").unwrap();
        ledger.add_position(Symbol::from("PTT"), dec!(40), 100, "t1").unwrap();
        drop(ledger);
        let mut engine = engine(dir.path());

        // Only the 40 lot is below its stop, but the handler sells oldest first.
        let signals = engine.on_tick(&Tick::new("PTT", dec!(33)));

        assert_eq!(
            signals,
            vec![Signal::StopLoss { price: dec!(33), buy_price: dec!(40) }]
        );
        let held: Vec<_> = engine.handler().ledger().positions().map(|lot| lot.buy_price).collect();
        assert_eq!(held, vec![dec!(40)]);
    }
}
