// In crates/core-types/src/types.rs

use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A ticker identifier, e.g. "PTT" or "KBANK".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(pub String);

impl Symbol {
    /// Creates a symbol, rejecting empty or whitespace-only identifiers.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptySymbol);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The direction of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.write_str("Buy"),
            Side::Sell => f.write_str("Sell"),
        }
    }
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            _ => Err(Error::UnknownSide(s.to_string())),
        }
    }
}

/// One price update from the market-data feed.
///
/// Field names on the wire follow the exchange feed's column headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    #[serde(rename = "ShareCode")]
    pub symbol: Symbol,
    #[serde(rename = "LastPrice")]
    pub last_price: Decimal,
    /// Exchange timestamp of the trade, passed through verbatim. May be empty.
    #[serde(rename = "TradeDateTime", default)]
    pub timestamp: String,
}

impl Tick {
    pub fn new(symbol: impl Into<String>, last_price: Decimal) -> Self {
        Self {
            symbol: Symbol(symbol.into()),
            last_price,
            timestamp: String::new(),
        }
    }

    pub fn at(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }
}

/// One discrete buy execution, tracked until it is sold.
///
/// The serde names are the ledger file's column headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    #[serde(rename = "Symbol")]
    pub symbol: Symbol,
    #[serde(rename = "BuyPrice")]
    pub buy_price: Decimal,
    #[serde(rename = "Volume")]
    pub volume: i64,
    #[serde(rename = "BuyTime")]
    pub buy_time: String,
}

impl Lot {
    pub fn buy_price(&self) -> Decimal {
        self.buy_price
    }
}

/// How an order should be priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderKind {
    /// Executable only at the given price or better.
    Limit(Decimal),
    /// Executable immediately at the best available price.
    Market,
}

/// A request to buy or sell a number of shares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub symbol: Symbol,
    pub side: Side,
    pub volume: i64,
    pub kind: OrderKind,
}

/// Confirmation that an order was accepted and filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderAck {
    pub order_id: u64,
    pub symbol: Symbol,
    pub side: Side,
    pub volume: i64,
    pub fill_price: Decimal,
}

/// A trade action a strategy took on a tick and the handler accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    /// A dip entry at `price`.
    Buy { price: Decimal },
    /// A limit sell above the take-profit level of a lot bought at `buy_price`.
    TakeProfit { price: Decimal, buy_price: Decimal },
    /// A market sell below the stop-loss level of a lot bought at `buy_price`.
    StopLoss { price: Decimal, buy_price: Decimal },
}
