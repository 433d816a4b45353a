// In crates/strategies/src/dip_buyer.rs

use crate::ema::EmaBook;
use crate::types::DipBuyerSettings;
use crate::{Error, Result, Strategy};
use core_types::{Signal, Side, Symbol, Tick};
use execution::OrderHandler;
use num_traits::FromPrimitive;
use risk::{ExitDecision, FeeAwareRiskManager, RiskManager};
use rust_decimal::Decimal;

/// Buy-the-dip mean reversion over a fixed list of symbols.
///
/// On every tick of a tracked symbol:
/// 1. the symbol's EMA absorbs the price;
/// 2. a limit buy of one clip is placed at the tick price when the price is
///    more than `buy_threshold` below the EMA and the position cap allows it;
/// 3. every held lot of the symbol is checked against its take-profit and
///    stop-loss levels, and one clip is sold per lot that crosses either.
///
/// Sells always use the fixed clip size, whatever the lot's recorded volume.
pub struct DipBuyer {
    emas: EmaBook,
    buy_threshold: Decimal,
    risk: Box<dyn RiskManager + Send + Sync>,
}

impl DipBuyer {
    /// Creates a new `DipBuyer` from its settings, with a `FeeAwareRiskManager`.
    pub fn new(settings: DipBuyerSettings) -> Result<Self> {
        let risk = FeeAwareRiskManager::new(&settings.risk)?;
        Self::with_risk_manager(&settings, Box::new(risk))
    }

    /// Creates a new `DipBuyer` using an externally built risk manager.
    /// The risk part of `settings` is ignored.
    pub fn with_risk_manager(
        settings: &DipBuyerSettings,
        risk: Box<dyn RiskManager + Send + Sync>,
    ) -> Result<Self> {
        let alpha = Decimal::from_f64(settings.ema_alpha)
            .filter(|a| *a > Decimal::ZERO && *a <= Decimal::ONE)
            .ok_or_else(|| {
                Error::InvalidSettings(format!("ema_alpha must be within (0, 1], got {}", settings.ema_alpha))
            })?;
        let buy_threshold = Decimal::from_f64(settings.buy_threshold)
            .filter(|t| *t >= Decimal::ZERO && *t < Decimal::ONE)
            .ok_or_else(|| {
                Error::InvalidSettings(format!(
                    "buy_threshold must be within [0, 1), got {}",
                    settings.buy_threshold
                ))
            })?;

        let symbols = settings
            .symbols
            .iter()
            .map(|s| Symbol::parse(s))
            .collect::<core_types::Result<Vec<_>>>()
            .map_err(|e| Error::InvalidSettings(e.to_string()))?;

        tracing::info!(
            symbols = symbols.len(),
            %alpha,
            %buy_threshold,
            risk_manager = risk.name(),
            "Dip buyer initialised."
        );

        Ok(Self {
            emas: EmaBook::new(alpha, symbols),
            buy_threshold,
            risk,
        })
    }

    /// The current EMA of `symbol`, if tracked and seeded.
    pub fn ema(&self, symbol: &Symbol) -> Option<Decimal> {
        self.emas.get(symbol)
    }

    pub fn is_tracked(&self, symbol: &Symbol) -> bool {
        self.emas.is_tracked(symbol)
    }

    /// Whether `price` is far enough below `ema` to count as a dip.
    pub fn is_dip(&self, price: Decimal, ema: Decimal) -> bool {
        ema > Decimal::ZERO && price < ema * (Decimal::ONE - self.buy_threshold)
    }

    fn try_enter(&self, symbol: &Symbol, price: Decimal, ema: Decimal, handler: &mut dyn OrderHandler) -> Option<Signal> {
        let held = handler.total_volume(symbol);
        if !self.risk.allows_entry(held) || !self.is_dip(price, ema) {
            return None;
        }

        match handler.create_order_to_limit(self.risk.clip_size(), price, Side::Buy, symbol) {
            Ok(_) => {
                tracing::info!(%symbol, %price, %ema, held, "BUY: dip below EMA triggered.");
                Some(Signal::Buy { price })
            }
            Err(e) => {
                tracing::warn!(%symbol, %price, error = %e, "Dip buy order was not accepted.");
                None
            }
        }
    }

    fn check_exits(&self, symbol: &Symbol, price: Decimal, handler: &mut dyn OrderHandler) -> Vec<Signal> {
        let clip = self.risk.clip_size();
        let lots = handler.lots(symbol);
        if lots.is_empty() || !handler.has_volume(symbol, clip) {
            return Vec::new();
        }

        let mut signals = Vec::new();
        for lot in &lots {
            let buy_price = lot.buy_price();
            match self.risk.evaluate_exit(price, buy_price) {
                Some(ExitDecision::TakeProfit) => {
                    match handler.create_order_to_limit(clip, price, Side::Sell, symbol) {
                        Ok(_) => {
                            tracing::info!(%symbol, %price, %buy_price, "TP: take-profit sell placed.");
                            signals.push(Signal::TakeProfit { price, buy_price });
                        }
                        Err(e) => {
                            tracing::warn!(%symbol, %price, %buy_price, error = %e, "Take-profit order was not accepted.");
                        }
                    }
                }
                Some(ExitDecision::StopLoss) => match handler.create_order_at_market(clip, Side::Sell, symbol) {
                    Ok(_) => {
                        tracing::info!(%symbol, %price, %buy_price, "SL: stop-loss sell placed.");
                        signals.push(Signal::StopLoss { price, buy_price });
                    }
                    Err(e) => {
                        tracing::warn!(%symbol, %price, %buy_price, error = %e, "Stop-loss order was not accepted.");
                    }
                },
                None => {}
            }
        }
        signals
    }
}

impl Strategy for DipBuyer {
    fn name(&self) -> &'static str {
        "DipBuyer"
    }

    fn on_tick(&mut self, tick: &Tick, handler: &mut dyn OrderHandler) -> Vec<Signal> {
        let symbol = &tick.symbol;
        let price = tick.last_price;

        // --- 1. EMA update (untracked symbols stop here) ---
        let Some(ema) = self.emas.update(symbol, price) else {
            tracing::trace!(%symbol, "Ignoring tick for untracked symbol.");
            return Vec::new();
        };

        // --- 2. Entry ---
        let mut signals: Vec<Signal> = self.try_enter(symbol, price, ema, handler).into_iter().collect();

        // --- 3. Exits ---
        signals.extend(self.check_exits(symbol, price, handler));
        signals
    }
}
