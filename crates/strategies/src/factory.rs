// In crates/strategies/src/factory.rs

use crate::dip_buyer::DipBuyer;
use crate::types::DipBuyerSettings;
use crate::Strategy;
use anyhow::Result;
use core_types::StrategyConfig;

/// Builds the strategy named in `config`, deserializing its `params` table.
pub fn create_strategy(config: &StrategyConfig) -> Result<Box<dyn Strategy + Send + Sync>> {
    let strategy: Box<dyn Strategy + Send + Sync> = match config.name.as_str() {
        "dip_buyer" => {
            let settings: DipBuyerSettings = config.params.clone().try_into()?;
            Box::new(DipBuyer::new(settings)?)
        }
        unknown => anyhow::bail!("Attempted to create unknown strategy: {}", unknown),
    };
    Ok(strategy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(toml_src: &str) -> StrategyConfig {
        toml::from_str(toml_src).unwrap()
    }

    #[test]
    fn builds_dip_buyer_with_defaults() {
        let strategy = create_strategy(&config(r#"name = "dip_buyer""#)).unwrap();
        assert_eq!(strategy.name(), "DipBuyer");
    }

    #[test]
    fn params_override_defaults() {
        let cfg = config(
            r#"
            name = "dip_buyer"
            [params]
            symbols = ["PTT", "SCB"]
            ema_alpha = 0.3
            max_positions_per_symbol = 2
            "#,
        );
        let settings: DipBuyerSettings = cfg.params.clone().try_into().unwrap();

        assert_eq!(settings.symbols, vec!["PTT", "SCB"]);
        assert_eq!(settings.ema_alpha, 0.3);
        assert_eq!(settings.buy_threshold, 0.005);
        assert_eq!(settings.risk.max_positions_per_symbol, 2);
        assert_eq!(settings.risk.trade_volume, 100);
        assert!(create_strategy(&cfg).is_ok());
    }

    #[test]
    fn unknown_strategy_is_an_error() {
        let err = create_strategy(&config(r#"name = "martingale""#)).err().unwrap();
        assert!(err.to_string().contains("martingale"));
    }

    #[test]
    fn invalid_params_are_an_error() {
        let cfg = config(
            r#"
            name = "dip_buyer"
            [params]
            ema_alpha = "fast"
            "#,
        );
        assert!(create_strategy(&cfg).is_err());
    }
}
