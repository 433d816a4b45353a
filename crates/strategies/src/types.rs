// In crates/strategies/src/types.rs

use risk::RiskSettings;
use serde::{Deserialize, Serialize};

/// Parameters of the dip-buying mean-reversion strategy.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DipBuyerSettings {
    /// Tickers the strategy is allowed to trade.
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,

    /// Smoothing factor of the price EMA. Higher reacts faster.
    #[serde(default = "default_ema_alpha")]
    pub ema_alpha: f64,

    /// Buy when the price is this fraction below the EMA (0.005 = 0.5%).
    #[serde(default = "default_buy_threshold")]
    pub buy_threshold: f64,

    #[serde(flatten)]
    pub risk: RiskSettings,
}

impl Default for DipBuyerSettings {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            ema_alpha: default_ema_alpha(),
            buy_threshold: default_buy_threshold(),
            risk: RiskSettings::default(),
        }
    }
}

fn default_ema_alpha() -> f64 { 0.2 }
fn default_buy_threshold() -> f64 { 0.005 }

// SET50 constituents.
fn default_symbols() -> Vec<String> {
    [
        "ADVANC", "AOT", "AWC", "BANPU", "BBL", "BCP", "BDMS", "BEM", "BH", "BJC",
        "BTS", "CBG", "CCET", "COM7", "CPALL", "CPF", "CPN", "CRC", "DELTA", "EGCO",
        "GPSC", "GULF", "HMPRO", "IVL", "KBANK", "KKP", "KTB", "KTC", "LH", "MINT",
        "MTC", "OR", "OSP", "PTT", "PTTEP", "PTTGC", "RATCH", "SCB", "SCC", "SCGP",
        "TCAP", "TIDLOR", "TISCO", "TLI", "TOP", "TRUE", "TTB", "TU", "VGI", "WHA",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
