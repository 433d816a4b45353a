// In crates/execution/src/paper.rs

use crate::{Error, OrderHandler, Result};
use chrono::Utc;
use core_types::{Lot, OrderAck, OrderKind, OrderRequest, Side, Symbol, Tick};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracker::{PositionTracker, STANDARD_CLIP};

/// A paper-trading handler whose holdings live in the position ledger.
///
/// Orders fill immediately and in full: limit orders at their limit price,
/// market orders at the last price seen for the symbol. Every filled buy
/// appends one ledger lot per board lot of 100 shares, and every filled sell
/// removes the oldest such lots, so the ledger on disk always matches what
/// `lots` and `total_volume` report.
///
/// Sells are first in, first out. An order cannot name the lot it closes, so
/// an exit triggered by one lot's level removes the oldest standard lot of
/// the symbol instead, which may be a different lot with a different cost
/// basis. The triggering lot then stays held and can fire again on a later
/// tick.
#[derive(Debug)]
pub struct PaperHandler {
    ledger: PositionTracker,
    marks: HashMap<Symbol, Decimal>,
    clock: String,
    next_order_id: u64,
}

impl PaperHandler {
    /// Creates a handler that starts from whatever the ledger already holds.
    pub fn new(ledger: PositionTracker) -> Self {
        tracing::info!(
            path = %ledger.path().display(),
            lots = ledger.positions().count(),
            unreadable_rows = ledger.unreadable_rows(),
            "Paper handler reconciled from position ledger."
        );
        Self {
            ledger,
            marks: HashMap::new(),
            clock: String::new(),
            next_order_id: 1,
        }
    }

    /// Records the last traded price of `symbol`, used to fill market orders.
    pub fn mark_price(&mut self, symbol: &Symbol, price: Decimal) {
        self.marks.insert(symbol.clone(), price);
    }

    /// Sets the timestamp written as `BuyTime` for subsequent buys.
    pub fn set_clock(&mut self, now: impl Into<String>) {
        self.clock = now.into();
    }

    pub fn ledger(&self) -> &PositionTracker {
        &self.ledger
    }

    pub fn into_ledger(self) -> PositionTracker {
        self.ledger
    }

    fn buy_time(&self) -> String {
        if self.clock.is_empty() {
            Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
        } else {
            self.clock.clone()
        }
    }

    fn held_clips(&self, symbol: &Symbol) -> i64 {
        self.ledger
            .positions_for(symbol)
            .filter(|lot| lot.volume == STANDARD_CLIP)
            .count() as i64
    }

    /// Validates and fills an order, updating the ledger.
    fn fill(&mut self, order: OrderRequest) -> Result<OrderAck> {
        if order.volume <= 0 || order.volume % STANDARD_CLIP != 0 {
            return Err(Error::rejected(format!(
                "volume {} is not a positive multiple of {}",
                order.volume, STANDARD_CLIP
            )));
        }

        let fill_price = match order.kind {
            OrderKind::Limit(price) if price <= Decimal::ZERO => {
                return Err(Error::rejected(format!("limit price {price} is not positive")));
            }
            OrderKind::Limit(price) => price,
            OrderKind::Market => *self.marks.get(&order.symbol).ok_or_else(|| {
                Error::rejected(format!("no market price known for {}", order.symbol))
            })?,
        };

        let clips = order.volume / STANDARD_CLIP;
        match order.side {
            Side::Buy => {
                let buy_time = self.buy_time();
                for _ in 0..clips {
                    self.ledger.add_position(
                        order.symbol.clone(),
                        fill_price,
                        STANDARD_CLIP,
                        buy_time.clone(),
                    )?;
                }
            }
            Side::Sell => {
                let held = self.held_clips(&order.symbol);
                if held < clips {
                    return Err(Error::rejected(format!(
                        "cannot sell {} of {}: only {} held",
                        order.volume,
                        order.symbol,
                        held * STANDARD_CLIP
                    )));
                }
                for _ in 0..clips {
                    // Indices shift after every removal, so look the lot up each time.
                    let oldest = self
                        .ledger
                        .get_oldest_position(&order.symbol)
                        .map(|(index, _)| index);
                    if let Some(index) = oldest {
                        self.ledger.remove_position(index)?;
                    }
                }
            }
        }

        let ack = OrderAck {
            order_id: self.next_order_id,
            symbol: order.symbol.clone(),
            side: order.side,
            volume: order.volume,
            fill_price,
        };
        self.next_order_id += 1;
        tracing::debug!(?order, ?ack, "Paper order filled.");
        Ok(ack)
    }
}

impl OrderHandler for PaperHandler {
    fn name(&self) -> &'static str {
        "PaperHandler"
    }

    fn on_market_data(&mut self, tick: &Tick) {
        self.mark_price(&tick.symbol, tick.last_price);
        self.set_clock(tick.timestamp.clone());
    }

    fn total_volume(&self, symbol: &Symbol) -> i64 {
        self.ledger.total_volume(symbol)
    }

    fn lots(&self, symbol: &Symbol) -> Vec<Lot> {
        self.ledger.positions_for(symbol).cloned().collect()
    }

    fn create_order_to_limit(
        &mut self,
        volume: i64,
        limit_price: Decimal,
        side: Side,
        symbol: &Symbol,
    ) -> Result<OrderAck> {
        self.fill(OrderRequest {
            symbol: symbol.clone(),
            side,
            volume,
            kind: OrderKind::Limit(limit_price),
        })
    }

    fn create_order_at_market(&mut self, volume: i64, side: Side, symbol: &Symbol) -> Result<OrderAck> {
        self.fill(OrderRequest {
            symbol: symbol.clone(),
            side,
            volume,
            kind: OrderKind::Market,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn sym(s: &str) -> Symbol {
        Symbol::from(s)
    }

    fn handler(dir: &std::path::Path) -> PaperHandler {
        PaperHandler::new(PositionTracker::open(dir, "team", "paper").unwrap())
    }

    #[test]
    fn limit_buy_appends_a_lot_at_the_limit_price() {
        let dir = tempdir().unwrap();
        let mut h = handler(dir.path());
        h.set_clock("2025-01-06 10:00:00");

        let ack = h.create_order_to_limit(100, dec!(34.25), Side::Buy, &sym("PTT")).unwrap();

        assert_eq!(ack.fill_price, dec!(34.25));
        assert_eq!(ack.order_id, 1);
        assert_eq!(h.total_volume(&sym("PTT")), 100);
        let lots = h.lots(&sym("PTT"));
        assert_eq!(lots.len(), 1);
        assert_eq!(lots[0].buy_time, "2025-01-06 10:00:00");
    }

    #[test]
    fn multi_clip_buy_records_one_lot_per_board_lot() {
        let dir = tempdir().unwrap();
        let mut h = handler(dir.path());

        h.create_order_to_limit(300, dec!(10), Side::Buy, &sym("BTS")).unwrap();

        assert_eq!(h.lots(&sym("BTS")).len(), 3);
        assert!(h.has_volume(&sym("BTS"), 300));
        assert!(!h.has_volume(&sym("BTS"), 400));
    }

    #[test]
    fn market_sell_removes_the_oldest_lot() {
        let dir = tempdir().unwrap();
        let mut h = handler(dir.path());
        h.create_order_to_limit(100, dec!(34), Side::Buy, &sym("PTT")).unwrap();
        h.create_order_to_limit(100, dec!(35), Side::Buy, &sym("PTT")).unwrap();
        h.mark_price(&sym("PTT"), dec!(33));

        let ack = h.create_order_at_market(100, Side::Sell, &sym("PTT")).unwrap();

        assert_eq!(ack.fill_price, dec!(33));
        let lots = h.lots(&sym("PTT"));
        assert_eq!(lots.len(), 1);
        assert_eq!(lots[0].buy_price, dec!(35));
    }

    #[test]
    fn rejects_orders_it_cannot_fill() {
        let dir = tempdir().unwrap();
        let mut h = handler(dir.path());

        let no_mark = h.create_order_at_market(100, Side::Buy, &sym("AOT"));
        assert!(matches!(no_mark, Err(Error::Rejected { .. })));

        let odd_lot = h.create_order_to_limit(50, dec!(60), Side::Buy, &sym("AOT"));
        assert!(matches!(odd_lot, Err(Error::Rejected { .. })));

        let zero_price = h.create_order_to_limit(100, dec!(0), Side::Buy, &sym("AOT"));
        assert!(matches!(zero_price, Err(Error::Rejected { .. })));

        let naked_sell = h.create_order_to_limit(100, dec!(60), Side::Sell, &sym("AOT"));
        assert!(matches!(naked_sell, Err(Error::Rejected { .. })));

        assert!(h.ledger().is_empty());
    }

    #[test]
    fn holdings_are_restored_from_the_ledger() {
        let dir = tempdir().unwrap();
        {
            let mut h = handler(dir.path());
            h.create_order_to_limit(200, dec!(140), Side::Buy, &sym("KBANK")).unwrap();
            h.create_order_to_limit(100, dec!(141), Side::Sell, &sym("KBANK")).unwrap();
        }

        let restored = handler(dir.path());

        assert_eq!(restored.total_volume(&sym("KBANK")), 100);
        assert_eq!(restored.lots(&sym("KBANK"))[0].buy_price, dec!(140));
    }

    #[test]
    fn market_data_marks_price_and_clock() {
        let dir = tempdir().unwrap();
        let mut h = handler(dir.path());
        h.on_market_data(&Tick::new("CPALL", dec!(58.75)).at("2025-01-06 14:30:00"));

        let ack = h.create_order_at_market(100, Side::Buy, &sym("CPALL")).unwrap();

        assert_eq!(ack.fill_price, dec!(58.75));
        assert_eq!(h.lots(&sym("CPALL"))[0].buy_time, "2025-01-06 14:30:00");
    }
}
