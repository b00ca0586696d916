use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::handle::ChatHandle;
use crate::id::AccountId;
use crate::money::WalletAmount;
use crate::rank::RoleRank;

/// A user account row.
///
/// Accounts are soft-deleted: `removed_at` is set instead of the row being
/// dropped, and removed accounts are excluded from active queries. The
/// `founder` flag marks the distinguished first-ever account, whose role is
/// immutable through the normal update path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub handle: ChatHandle,
    pub display_name: String,
    pub wallet: WalletAmount,
    pub role: RoleRank,
    /// Set on the very first account ever created.
    pub founder: bool,
    pub created_at: DateTime<Utc>,
    pub removed_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Create a fresh, active account at the given rank.
    pub fn new(
        handle: ChatHandle,
        display_name: impl Into<String>,
        role: RoleRank,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AccountId::new(),
            handle,
            display_name: display_name.into(),
            wallet: WalletAmount::ZERO,
            role,
            founder: false,
            created_at,
            removed_at: None,
        }
    }

    /// Active means not soft-deleted.
    pub fn is_active(&self) -> bool {
        self.removed_at.is_none()
    }

    /// Mark the account removed. Idempotent: the first removal wins.
    pub fn remove(&mut self, at: DateTime<Utc>) {
        if self.removed_at.is_none() {
            self.removed_at = Some(at);
        }
    }
}
