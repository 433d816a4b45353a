use serde::{Deserialize, Serialize};
use toml::Value;

/// Selects a strategy by name and carries its raw parameter table.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct StrategyConfig {
    pub name: String,
    // This will hold the `params = { ... }` table from the TOML
    #[serde(default = "empty_params")]
    pub params: Value,
}

fn empty_params() -> Value {
    Value::Table(Default::default())
}
