use serde::{Deserialize, Serialize};

use canteen_ledger::ReconcileOutcome;
use canteen_roles::RoleIdentifier;
use canteen_types::{RoleRank, WalletAmount};

/// Optional updates to apply to one account.
///
/// Each field is three-state through `Option`: absent (leave alone) or
/// present with a value (apply it, zero included). An explicit
/// `Some(WalletAmount::ZERO)` empties the wallet, and an explicit
/// `Some(0)` lunch target clears every grant — neither is dropped by a
/// truthiness test.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateParams {
    pub wallet: Option<WalletAmount>,
    pub role: Option<RoleIdentifier>,
    /// Desired number of active free-lunch grants.
    pub lunch_target: Option<i64>,
}

impl UpdateParams {
    pub fn is_empty(&self) -> bool {
        self.wallet.is_none() && self.role.is_none() && self.lunch_target.is_none()
    }

    pub fn wallet(amount: WalletAmount) -> Self {
        Self {
            wallet: Some(amount),
            ..Default::default()
        }
    }

    pub fn role(role: impl Into<RoleIdentifier>) -> Self {
        Self {
            role: Some(role.into()),
            ..Default::default()
        }
    }

    pub fn lunch_target(target: i64) -> Self {
        Self {
            lunch_target: Some(target),
            ..Default::default()
        }
    }
}

/// What happened to the role field of an update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleOutcome {
    /// No role was supplied.
    NotRequested,
    /// The role was resolved and overwritten.
    Changed { from: RoleRank, to: RoleRank },
    /// The subject is the protected first account; the requested change
    /// was skipped and is reported instead of silently dropped.
    ProtectedAccountIgnored,
}

/// Everything an [`apply_update`] run did.
///
/// [`apply_update`]: crate::service::AccountService::apply_update
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdateReport {
    pub wallet_updated: bool,
    pub role_outcome: RoleOutcome,
    /// Present when a lunch target was supplied.
    pub reconcile: Option<ReconcileOutcome>,
}
