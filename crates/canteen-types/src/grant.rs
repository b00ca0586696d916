use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::id::{AccountId, GrantId};

/// A single redeemable free-lunch entitlement.
///
/// A grant is immutable once issued except for the `redeemed` flag, which is
/// set exactly once and never unset. Expired or redeemed grants are inert
/// but kept for audit; only ledger reconciliation hard-deletes rows.
///
/// Lifecycle: `active → (expired by time | redeemed | deleted)`. No
/// transition reverses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LunchGrant {
    pub id: GrantId,
    pub recipient: AccountId,
    pub issuer: AccountId,
    /// Free-text attribution of why the grant exists.
    pub reason: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub redeemed: bool,
}

impl LunchGrant {
    /// Issue a grant valid for `validity` from `issued_at`.
    pub fn issue(
        recipient: AccountId,
        issuer: AccountId,
        reason: impl Into<String>,
        issued_at: DateTime<Utc>,
        validity: Duration,
    ) -> Self {
        Self {
            id: GrantId::new(),
            recipient,
            issuer,
            reason: reason.into(),
            issued_at,
            expires_at: issued_at + validity,
            redeemed: false,
        }
    }

    /// A grant is active iff it has not been redeemed and has not expired.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.redeemed && self.expires_at > now
    }

    /// Consume the grant. Fails on double redemption or after expiry.
    pub fn redeem(&mut self, now: DateTime<Utc>) -> Result<(), TypeError> {
        if self.redeemed {
            return Err(TypeError::AlreadyRedeemed);
        }
        if self.expires_at <= now {
            return Err(TypeError::GrantExpired(self.expires_at));
        }
        self.redeemed = true;
        Ok(())
    }
}
