use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Configuration for the entitlement ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// How long a freshly issued grant stays valid, in days.
    pub validity_days: i64,
    /// Prefix for the generated attribution reason; the issuer's display
    /// name is appended, e.g. `"Updated by Ada"`.
    pub reason_prefix: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            validity_days: 7,
            reason_prefix: "Updated by".to_string(),
        }
    }
}

impl LedgerConfig {
    pub fn validity(&self) -> Duration {
        Duration::days(self.validity_days)
    }

    pub fn reason_for(&self, issuer_name: &str) -> String {
        format!("{} {}", self.reason_prefix, issuer_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_a_week() {
        let config = LedgerConfig::default();
        assert_eq!(config.validity(), Duration::days(7));
    }

    #[test]
    fn reason_names_the_issuer() {
        let config = LedgerConfig::default();
        assert_eq!(config.reason_for("Ada"), "Updated by Ada");
    }
}
