use chrono::{DateTime, Utc};

use canteen_types::{Account, AccountId, ChatHandle, GrantId, LunchGrant};

use crate::error::StoreResult;
use crate::query::AccountQuery;

/// Account persistence boundary.
///
/// All implementations must satisfy these invariants:
/// - Every call executes as one atomic unit.
/// - Accounts are soft-deleted: `remove` marks the row, never drops it, and
///   marked rows are invisible to `find_by_handle` and `list`.
/// - Chat handles are unique across all rows, removed ones included.
/// - `count` reports every row ever inserted, removed ones included — the
///   first-account rule depends on it never going back to zero.
pub trait AccountStore: Send + Sync {
    /// Point lookup by row id. Returns soft-deleted rows too.
    fn get(&self, id: &AccountId) -> StoreResult<Option<Account>>;

    /// Look up an **active** account by its chat handle.
    fn find_by_handle(&self, handle: &ChatHandle) -> StoreResult<Option<Account>>;

    fn insert(&self, account: &Account) -> StoreResult<()>;

    /// Single-row atomic overwrite of an existing account.
    fn update(&self, account: &Account) -> StoreResult<()>;

    /// Soft delete: set the removal timestamp.
    fn remove(&self, id: &AccountId, at: DateTime<Utc>) -> StoreResult<()>;

    /// Total rows ever inserted, including soft-deleted.
    fn count(&self) -> StoreResult<u64>;

    /// Active accounts matching the query, sorted and paged.
    fn list(&self, query: &AccountQuery) -> StoreResult<Vec<Account>>;
}

/// Grant persistence boundary.
///
/// Batch operations are all-or-nothing: a failed batch leaves the store
/// unchanged. Grants belong to their recipient account and are hard-deleted
/// only here, by explicit request.
pub trait GrantStore: Send + Sync {
    fn get_grant(&self, id: &GrantId) -> StoreResult<Option<LunchGrant>>;

    /// Every grant addressed to the recipient, active or inert.
    fn grants_for(&self, recipient: &AccountId) -> StoreResult<Vec<LunchGrant>>;

    /// Active grants (unredeemed, unexpired at `now`) for the recipient,
    /// ordered by ascending expiry.
    fn active_for(&self, recipient: &AccountId, now: DateTime<Utc>)
        -> StoreResult<Vec<LunchGrant>>;

    /// Count of active grants. Default implementation selects and counts;
    /// backends may override with a counting query.
    fn count_active(&self, recipient: &AccountId, now: DateTime<Utc>) -> StoreResult<u64> {
        Ok(self.active_for(recipient, now)?.len() as u64)
    }

    /// Insert a batch of new grants atomically.
    fn insert_batch(&self, grants: &[LunchGrant]) -> StoreResult<()>;

    /// Hard-delete the given grant rows atomically. Every id must exist.
    /// Returns the number of rows removed.
    fn delete_batch(&self, ids: &[GrantId]) -> StoreResult<u64>;

    /// Hard-delete every grant for the recipient, active and inert alike.
    /// Returns the number of rows removed.
    fn delete_all_for(&self, recipient: &AccountId) -> StoreResult<u64>;

    /// Single-row atomic overwrite (redeemed flag).
    fn update_grant(&self, grant: &LunchGrant) -> StoreResult<()>;
}
