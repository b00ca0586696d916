use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use canteen_store::GrantStore;
use canteen_types::{Account, AccountId, GrantId, LunchGrant};

use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::outcome::ReconcileOutcome;

/// Entitlement ledger over a grant store.
///
/// Reconciliation is a read-count-then-write-delta sequence, so two
/// concurrent runs for the same recipient could both observe the same count
/// and double-issue or double-revoke. The ledger serializes runs per
/// recipient with a lock keyed by account id; different recipients still
/// reconcile in parallel.
pub struct EntitlementLedger<S> {
    store: Arc<S>,
    config: LedgerConfig,
    locks: Mutex<HashMap<AccountId, Arc<Mutex<()>>>>,
}

impl<S: GrantStore> EntitlementLedger<S> {
    pub fn new(store: Arc<S>, config: LedgerConfig) -> Self {
        Self {
            store,
            config,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Count of grants that are unredeemed and unexpired at `now`.
    pub fn active_count(&self, recipient: &AccountId, now: DateTime<Utc>) -> LedgerResult<u64> {
        Ok(self.store.count_active(recipient, now)?)
    }

    /// Bring the recipient's active-grant count to `target`.
    ///
    /// - `target <= 0` hard-deletes **all** grants for the recipient,
    ///   active and inert alike.
    /// - A shortfall issues the missing grants in one atomic batch, each
    ///   attributed to `issuer` and expiring one validity window from `now`.
    /// - An excess hard-deletes exactly the surplus, picking the active
    ///   grants with the soonest expiry so the recipient keeps the
    ///   longest-lived ones.
    /// - A match writes nothing.
    ///
    /// The issuer must already be authorized by the caller.
    pub fn reconcile(
        &self,
        recipient: &AccountId,
        issuer: &Account,
        target: i64,
        now: DateTime<Utc>,
    ) -> LedgerResult<ReconcileOutcome> {
        let lock = self.lock_for(recipient);
        let _guard = lock.lock().expect("lock poisoned");

        if target <= 0 {
            let removed = self.store.delete_all_for(recipient)?;
            info!(%recipient, removed, "cleared all grants");
            return Ok(ReconcileOutcome::ClearedAll { removed });
        }

        let target = target as u64;
        let current = self.store.count_active(recipient, now)?;
        debug!(%recipient, current, target, "reconciling grants");

        if target > current {
            let delta = target - current;
            let grants: Vec<LunchGrant> = (0..delta)
                .map(|_| {
                    LunchGrant::issue(
                        *recipient,
                        issuer.id,
                        self.config.reason_for(&issuer.display_name),
                        now,
                        self.config.validity(),
                    )
                })
                .collect();
            self.store.insert_batch(&grants)?;
            info!(%recipient, issued = delta, issuer = %issuer.id, "issued grants");
            Ok(ReconcileOutcome::Issued { count: delta })
        } else if target < current {
            let delta = (current - target) as usize;
            // active_for is ordered by ascending expiry: the head of the
            // list is the soonest to lapse.
            let victims: Vec<GrantId> = self
                .store
                .active_for(recipient, now)?
                .iter()
                .take(delta)
                .map(|grant| grant.id)
                .collect();
            let removed = self.store.delete_batch(&victims)?;
            info!(%recipient, revoked = removed, "revoked grants");
            Ok(ReconcileOutcome::Revoked { count: removed })
        } else {
            Ok(ReconcileOutcome::Unchanged { active: current })
        }
    }

    /// Consume a single grant. Redeemed rows stay in the store for audit.
    pub fn redeem(&self, id: &GrantId, now: DateTime<Utc>) -> LedgerResult<LunchGrant> {
        let mut grant = self
            .store
            .get_grant(id)?
            .ok_or(LedgerError::GrantNotFound(*id))?;
        grant.redeem(now)?;
        self.store.update_grant(&grant)?;
        debug!(grant = %grant.id, recipient = %grant.recipient, "grant redeemed");
        Ok(grant)
    }

    fn lock_for(&self, recipient: &AccountId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().expect("lock poisoned");
        locks
            .entry(*recipient)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
