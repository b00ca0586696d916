use std::path::Path;

use serde::{Deserialize, Serialize};

use canteen_accounts::ServiceConfig;
use canteen_ledger::LedgerConfig;

/// On-disk CLI configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Currency prefix rendered in front of wallet amounts.
    pub currency: String,
    /// How many days a freshly issued free lunch stays valid.
    pub validity_days: i64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            currency: "NGN".to_string(),
            validity_days: 7,
        }
    }
}

impl CliConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            currency_prefix: self.currency.clone(),
            ..Default::default()
        }
    }

    pub fn ledger_config(&self) -> LedgerConfig {
        LedgerConfig {
            validity_days: self.validity_days,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = CliConfig::default();
        assert_eq!(c.currency, "NGN");
        assert_eq!(c.validity_days, 7);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let c: CliConfig = toml::from_str("currency = \"EUR\"").unwrap();
        assert_eq!(c.currency, "EUR");
        assert_eq!(c.validity_days, 7);
    }
}
