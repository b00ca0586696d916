use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use tracing::debug;

use canteen_types::{Account, AccountId, ChatHandle, GrantId, LunchGrant};

use crate::error::{StoreError, StoreResult};
use crate::query::{AccountQuery, AccountSort, SortDirection};
use crate::traits::{AccountStore, GrantStore};

/// In-memory, HashMap-based store for tests, local demos, and embedding.
///
/// Both stores share one `RwLock`, so a batch mutation is atomic with
/// respect to every other call. Rows are cloned on read/write.
pub struct InMemoryStore {
    inner: RwLock<StoreState>,
}

#[derive(Default)]
struct StoreState {
    accounts: HashMap<AccountId, Account>,
    handles: HashMap<ChatHandle, AccountId>,
    grants: HashMap<GrantId, LunchGrant>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreState::default()),
        }
    }

    /// Number of account rows, soft-deleted included.
    pub fn account_rows(&self) -> usize {
        self.inner.read().expect("lock poisoned").accounts.len()
    }

    /// Number of grant rows.
    pub fn grant_rows(&self) -> usize {
        self.inner.read().expect("lock poisoned").grants.len()
    }

    pub fn is_empty(&self) -> bool {
        let state = self.inner.read().expect("lock poisoned");
        state.accounts.is_empty() && state.grants.is_empty()
    }

    /// Remove all rows.
    pub fn clear(&self) {
        let mut state = self.inner.write().expect("lock poisoned");
        state.accounts.clear();
        state.handles.clear();
        state.grants.clear();
    }

    /// Hard-purge an account row together with every grant addressed to it.
    /// Grants cascade with their recipient. Test/maintenance helper; the
    /// normal lifecycle is the soft delete in [`AccountStore::remove`].
    pub fn purge_account(&self, id: &AccountId) -> StoreResult<()> {
        let mut state = self.inner.write().expect("lock poisoned");
        let account = state
            .accounts
            .remove(id)
            .ok_or(StoreError::AccountNotFound(*id))?;
        state.handles.remove(&account.handle);
        state.grants.retain(|_, grant| grant.recipient != *id);
        Ok(())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountStore for InMemoryStore {
    fn get(&self, id: &AccountId) -> StoreResult<Option<Account>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state.accounts.get(id).cloned())
    }

    fn find_by_handle(&self, handle: &ChatHandle) -> StoreResult<Option<Account>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state
            .handles
            .get(handle)
            .and_then(|id| state.accounts.get(id))
            .filter(|account| account.is_active())
            .cloned())
    }

    fn insert(&self, account: &Account) -> StoreResult<()> {
        let mut state = self.inner.write().expect("lock poisoned");
        if state.accounts.contains_key(&account.id) {
            return Err(StoreError::DuplicateId);
        }
        // Handles stay reserved even after soft deletion, like a unique
        // column in the relational backend.
        if state.handles.contains_key(&account.handle) {
            return Err(StoreError::DuplicateHandle(account.handle.to_string()));
        }
        state.handles.insert(account.handle.clone(), account.id);
        state.accounts.insert(account.id, account.clone());
        Ok(())
    }

    fn update(&self, account: &Account) -> StoreResult<()> {
        let mut state = self.inner.write().expect("lock poisoned");
        if !state.accounts.contains_key(&account.id) {
            return Err(StoreError::AccountNotFound(account.id));
        }
        state.accounts.insert(account.id, account.clone());
        Ok(())
    }

    fn remove(&self, id: &AccountId, at: DateTime<Utc>) -> StoreResult<()> {
        let mut state = self.inner.write().expect("lock poisoned");
        let account = state
            .accounts
            .get_mut(id)
            .ok_or(StoreError::AccountNotFound(*id))?;
        account.remove(at);
        Ok(())
    }

    fn count(&self) -> StoreResult<u64> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state.accounts.len() as u64)
    }

    fn list(&self, query: &AccountQuery) -> StoreResult<Vec<Account>> {
        let state = self.inner.read().expect("lock poisoned");
        let needle = query.search.as_deref().map(str::to_lowercase);

        let mut rows: Vec<Account> = state
            .accounts
            .values()
            .filter(|account| account.is_active())
            .filter(|account| match &needle {
                Some(needle) => {
                    account.display_name.to_lowercase().contains(needle)
                        || account.handle.as_str().to_lowercase().contains(needle)
                }
                None => true,
            })
            .cloned()
            .collect();

        rows.sort_by(|a, b| {
            let ordering = match query.sort {
                AccountSort::Name => a.display_name.cmp(&b.display_name),
                AccountSort::Wallet => a
                    .wallet
                    .get()
                    .partial_cmp(&b.wallet.get())
                    .unwrap_or(std::cmp::Ordering::Equal),
                AccountSort::Role => a.role.cmp(&b.role),
            };
            // Row id as tiebreak keeps paging stable across calls.
            let ordering = ordering.then(a.id.cmp(&b.id));
            match query.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });

        let rows = rows
            .into_iter()
            .skip(query.offset)
            .take(query.limit.unwrap_or(usize::MAX))
            .collect();
        Ok(rows)
    }
}

impl GrantStore for InMemoryStore {
    fn get_grant(&self, id: &GrantId) -> StoreResult<Option<LunchGrant>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state.grants.get(id).cloned())
    }

    fn grants_for(&self, recipient: &AccountId) -> StoreResult<Vec<LunchGrant>> {
        let state = self.inner.read().expect("lock poisoned");
        let mut rows: Vec<LunchGrant> = state
            .grants
            .values()
            .filter(|grant| grant.recipient == *recipient)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.expires_at.cmp(&b.expires_at).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    fn active_for(
        &self,
        recipient: &AccountId,
        now: DateTime<Utc>,
    ) -> StoreResult<Vec<LunchGrant>> {
        let state = self.inner.read().expect("lock poisoned");
        let mut rows: Vec<LunchGrant> = state
            .grants
            .values()
            .filter(|grant| grant.recipient == *recipient && grant.is_active(now))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.expires_at.cmp(&b.expires_at).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    fn insert_batch(&self, grants: &[LunchGrant]) -> StoreResult<()> {
        let mut state = self.inner.write().expect("lock poisoned");
        // Validate the whole batch before touching the map so a failure
        // leaves the store unchanged.
        for grant in grants {
            if state.grants.contains_key(&grant.id) {
                return Err(StoreError::DuplicateId);
            }
        }
        for grant in grants {
            state.grants.insert(grant.id, grant.clone());
        }
        debug!(count = grants.len(), "inserted grant batch");
        Ok(())
    }

    fn delete_batch(&self, ids: &[GrantId]) -> StoreResult<u64> {
        let mut state = self.inner.write().expect("lock poisoned");
        for id in ids {
            if !state.grants.contains_key(id) {
                return Err(StoreError::GrantNotFound(*id));
            }
        }
        for id in ids {
            state.grants.remove(id);
        }
        debug!(count = ids.len(), "deleted grant batch");
        Ok(ids.len() as u64)
    }

    fn delete_all_for(&self, recipient: &AccountId) -> StoreResult<u64> {
        let mut state = self.inner.write().expect("lock poisoned");
        let before = state.grants.len();
        state.grants.retain(|_, grant| grant.recipient != *recipient);
        let removed = (before - state.grants.len()) as u64;
        debug!(%recipient, removed, "deleted all grants for recipient");
        Ok(removed)
    }

    fn update_grant(&self, grant: &LunchGrant) -> StoreResult<()> {
        let mut state = self.inner.write().expect("lock poisoned");
        if !state.grants.contains_key(&grant.id) {
            return Err(StoreError::GrantNotFound(grant.id));
        }
        state.grants.insert(grant.id, grant.clone());
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("account_rows", &self.account_rows())
            .field("grant_rows", &self.grant_rows())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use canteen_types::{RoleRank, WalletAmount};

    fn account(handle: &str, name: &str) -> Account {
        Account::new(
            ChatHandle::new(handle).unwrap(),
            name,
            RoleRank(1),
            Utc::now(),
        )
    }

    fn grant_for(recipient: AccountId, expires_in: Duration, now: DateTime<Utc>) -> LunchGrant {
        LunchGrant::issue(recipient, AccountId::new(), "test", now, expires_in)
    }

    #[test]
    fn insert_and_find_by_handle() {
        let store = InMemoryStore::new();
        let a = account("U1", "Ada");
        store.insert(&a).unwrap();
        let found = store
            .find_by_handle(&ChatHandle::new("U1").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(found.id, a.id);
    }

    #[test]
    fn duplicate_handle_rejected() {
        let store = InMemoryStore::new();
        store.insert(&account("U1", "Ada")).unwrap();
        let err = store.insert(&account("U1", "Grace")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateHandle(_)));
    }

    #[test]
    fn soft_deleted_account_is_invisible_but_counted() {
        let store = InMemoryStore::new();
        let a = account("U1", "Ada");
        store.insert(&a).unwrap();
        store.remove(&a.id, Utc::now()).unwrap();

        let handle = ChatHandle::new("U1").unwrap();
        assert!(store.find_by_handle(&handle).unwrap().is_none());
        assert!(store.list(&AccountQuery::default()).unwrap().is_empty());
        // The row itself survives and keeps feeding count().
        assert_eq!(store.count().unwrap(), 1);
        assert!(store.get(&a.id).unwrap().is_some());
    }

    #[test]
    fn removed_handle_stays_reserved() {
        let store = InMemoryStore::new();
        let a = account("U1", "Ada");
        store.insert(&a).unwrap();
        store.remove(&a.id, Utc::now()).unwrap();
        assert!(matches!(
            store.insert(&account("U1", "Grace")),
            Err(StoreError::DuplicateHandle(_))
        ));
    }

    #[test]
    fn update_requires_existing_row() {
        let store = InMemoryStore::new();
        let a = account("U1", "Ada");
        assert!(matches!(
            store.update(&a),
            Err(StoreError::AccountNotFound(_))
        ));
    }

    #[test]
    fn list_default_is_wallet_descending() {
        let store = InMemoryStore::new();
        let mut poor = account("U1", "Poor");
        poor.wallet = WalletAmount::new(10.0).unwrap();
        let mut rich = account("U2", "Rich");
        rich.wallet = WalletAmount::new(900.0).unwrap();
        store.insert(&poor).unwrap();
        store.insert(&rich).unwrap();

        let rows = store.list(&AccountQuery::default()).unwrap();
        assert_eq!(rows[0].id, rich.id);
        assert_eq!(rows[1].id, poor.id);
    }

    #[test]
    fn list_search_matches_name_and_handle() {
        let store = InMemoryStore::new();
        store.insert(&account("U1", "Ada Lovelace")).unwrap();
        store.insert(&account("U2", "Grace Hopper")).unwrap();

        let by_name = store.list(&AccountQuery::searching("lovelace")).unwrap();
        assert_eq!(by_name.len(), 1);
        let by_handle = store.list(&AccountQuery::searching("u2")).unwrap();
        assert_eq!(by_handle.len(), 1);
        assert_eq!(by_handle[0].display_name, "Grace Hopper");
    }

    #[test]
    fn list_paging() {
        let store = InMemoryStore::new();
        for i in 0..5 {
            store
                .insert(&account(&format!("U{i}"), &format!("User {i}")))
                .unwrap();
        }
        let query = AccountQuery {
            sort: AccountSort::Name,
            direction: SortDirection::Ascending,
            offset: 2,
            limit: Some(2),
            ..Default::default()
        };
        let rows = store.list(&query).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].display_name, "User 2");
    }

    #[test]
    fn active_for_orders_by_ascending_expiry() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        let recipient = AccountId::new();
        let late = grant_for(recipient, Duration::days(10), now);
        let early = grant_for(recipient, Duration::days(1), now);
        let mid = grant_for(recipient, Duration::days(5), now);
        store
            .insert_batch(&[late.clone(), early.clone(), mid.clone()])
            .unwrap();

        let rows = store.active_for(&recipient, now).unwrap();
        let ids: Vec<_> = rows.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![early.id, mid.id, late.id]);
    }

    #[test]
    fn active_for_excludes_expired_and_redeemed() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        let recipient = AccountId::new();
        let expired = grant_for(recipient, Duration::days(-1), now);
        let mut redeemed = grant_for(recipient, Duration::days(5), now);
        redeemed.redeem(now).unwrap();
        let live = grant_for(recipient, Duration::days(5), now);
        store
            .insert_batch(&[expired, redeemed, live.clone()])
            .unwrap();

        assert_eq!(store.count_active(&recipient, now).unwrap(), 1);
        assert_eq!(store.active_for(&recipient, now).unwrap()[0].id, live.id);
        // All three rows still exist.
        assert_eq!(store.grants_for(&recipient).unwrap().len(), 3);
    }

    #[test]
    fn delete_batch_is_all_or_nothing() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        let recipient = AccountId::new();
        let g = grant_for(recipient, Duration::days(1), now);
        store.insert_batch(&[g.clone()]).unwrap();

        let missing = GrantId::new();
        let err = store.delete_batch(&[g.id, missing]).unwrap_err();
        assert!(matches!(err, StoreError::GrantNotFound(_)));
        // The existing row must not have been deleted.
        assert_eq!(store.grant_rows(), 1);

        assert_eq!(store.delete_batch(&[g.id]).unwrap(), 1);
        assert_eq!(store.grant_rows(), 0);
    }

    #[test]
    fn insert_batch_is_all_or_nothing() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        let recipient = AccountId::new();
        let g = grant_for(recipient, Duration::days(1), now);
        store.insert_batch(&[g.clone()]).unwrap();

        let fresh = grant_for(recipient, Duration::days(2), now);
        let err = store.insert_batch(&[fresh, g]).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId));
        assert_eq!(store.grant_rows(), 1);
    }

    #[test]
    fn delete_all_for_takes_inert_rows_too() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        let recipient = AccountId::new();
        let other = AccountId::new();
        let expired = grant_for(recipient, Duration::days(-1), now);
        let live = grant_for(recipient, Duration::days(5), now);
        let foreign = grant_for(other, Duration::days(5), now);
        store.insert_batch(&[expired, live, foreign]).unwrap();

        assert_eq!(store.delete_all_for(&recipient).unwrap(), 2);
        assert_eq!(store.grants_for(&recipient).unwrap().len(), 0);
        assert_eq!(store.grants_for(&other).unwrap().len(), 1);
    }

    #[test]
    fn purge_cascades_grants() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        let a = account("U1", "Ada");
        store.insert(&a).unwrap();
        store
            .insert_batch(&[grant_for(a.id, Duration::days(1), now)])
            .unwrap();

        store.purge_account(&a.id).unwrap();
        assert!(store.is_empty());
        // Purging frees the handle again.
        store.insert(&account("U1", "Grace")).unwrap();
    }
}
