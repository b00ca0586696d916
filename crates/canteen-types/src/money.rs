use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A non-negative wallet balance.
///
/// The stored value keeps the full precision it was supplied with; rounding
/// to two decimals happens only at display time. `123.456` stays `123.456`
/// internally and renders as `"123.46"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct WalletAmount(f64);

/// Health band of a wallet balance, used by callers to pick urgency cues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WalletStatus {
    /// Balance at or below the danger threshold.
    Danger,
    /// Balance above danger but below the healthy threshold.
    Warning,
    /// Balance at or above the healthy threshold.
    Healthy,
}

/// At or below this, a wallet is in the danger band.
const DANGER_AT_OR_BELOW: f64 = 200.0;
/// At or above this, a wallet is healthy.
const HEALTHY_FROM: f64 = 500.0;

impl WalletAmount {
    pub const ZERO: Self = Self(0.0);

    /// Create an amount. Rejects negative and non-finite values.
    pub fn new(value: f64) -> Result<Self, TypeError> {
        if !value.is_finite() {
            return Err(TypeError::NonFiniteAmount(value));
        }
        if value < 0.0 {
            return Err(TypeError::NegativeAmount(value));
        }
        Ok(Self(value))
    }

    /// The raw, unrounded value.
    pub fn get(self) -> f64 {
        self.0
    }

    pub fn status(self) -> WalletStatus {
        if self.0 >= HEALTHY_FROM {
            WalletStatus::Healthy
        } else if self.0 <= DANGER_AT_OR_BELOW {
            WalletStatus::Danger
        } else {
            WalletStatus::Warning
        }
    }

    /// Render with a currency prefix, e.g. `"NGN123.46"`.
    pub fn with_currency(self, prefix: &str) -> String {
        format!("{}{}", prefix, self)
    }
}

impl fmt::Display for WalletAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
