use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use canteen_ledger::{EntitlementLedger, LedgerConfig};
use canteen_roles::{RoleIdentifier, RoleRegistry};
use canteen_store::{AccountQuery, AccountStore, GrantStore, InMemoryStore, StoreError};
use canteen_types::{Account, ChatHandle, WalletAmount, WalletStatus};

use crate::error::{AccountError, AccountResult};
use crate::params::{RoleOutcome, UpdateParams, UpdateReport};

/// Service-level configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Prefix rendered in front of wallet amounts, e.g. `"NGN"`.
    pub currency_prefix: String,
    /// Promote the first-ever registered account to the highest rank.
    pub promote_first_account: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            currency_prefix: "NGN".to_string(),
            promote_first_account: true,
        }
    }
}

/// Wallet + entitlement snapshot for one user, ready for a response
/// formatter (the formatting itself lives outside this crate).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub display_name: String,
    pub wallet: WalletAmount,
    /// e.g. `"NGN1234.50"`.
    pub wallet_with_currency: String,
    pub wallet_status: WalletStatus,
    pub active_lunches: u64,
}

/// The account service: wallet balances, role assignment, and entitlement
/// targets for user accounts.
///
/// Wallet/role persistence and grant reconciliation are two separate
/// storage operations. If the first commits and the second fails, the
/// first stays committed — the reference system behaves this way and the
/// error still propagates to the caller.
pub struct AccountService<A, G> {
    accounts: Arc<A>,
    registry: RoleRegistry,
    ledger: EntitlementLedger<G>,
    config: ServiceConfig,
}

impl AccountService<InMemoryStore, InMemoryStore> {
    /// A self-contained in-memory service for tests and local demos.
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::new(
            store.clone(),
            store,
            RoleRegistry::builtin(),
            LedgerConfig::default(),
            ServiceConfig::default(),
        )
    }
}

impl<A: AccountStore, G: GrantStore> AccountService<A, G> {
    pub fn new(
        accounts: Arc<A>,
        grants: Arc<G>,
        registry: RoleRegistry,
        ledger_config: LedgerConfig,
        config: ServiceConfig,
    ) -> Self {
        Self {
            accounts,
            registry,
            ledger: EntitlementLedger::new(grants, ledger_config),
            config,
        }
    }

    pub fn registry(&self) -> &RoleRegistry {
        &self.registry
    }

    pub fn ledger(&self) -> &EntitlementLedger<G> {
        &self.ledger
    }

    /// Register a new account at the lowest rank.
    ///
    /// The very first account ever created is promoted to the highest rank
    /// at creation time — a one-time, identity-triggered side effect, not a
    /// general rule. The store's row count includes soft-deleted accounts,
    /// so the promotion can never fire twice.
    pub fn register(
        &self,
        handle: ChatHandle,
        display_name: impl Into<String>,
        now: DateTime<Utc>,
    ) -> AccountResult<Account> {
        let first_ever = self.accounts.count()? == 0;
        let mut account = Account::new(handle, display_name, self.registry.lowest_rank(), now);

        if first_ever && self.config.promote_first_account {
            account.role = self.registry.highest_rank();
            account.founder = true;
            info!(handle = %account.handle, "first account promoted to highest rank");
        }

        match self.accounts.insert(&account) {
            Ok(()) => Ok(account),
            Err(StoreError::DuplicateHandle(handle)) => Err(AccountError::HandleTaken(handle)),
            Err(err) => Err(err.into()),
        }
    }

    /// Threshold authorization: does the actor's rank satisfy `required`?
    ///
    /// Denial is a plain `false`, never an error. An unresolvable
    /// requirement denies everyone.
    pub fn authorize(&self, actor: &Account, required: &RoleIdentifier) -> bool {
        self.registry.satisfies(actor.role, required)
    }

    /// Apply an external parameter set to the subject account.
    ///
    /// Wallet and role changes are persisted as one atomic row write, then
    /// the lunch target (when present) is reconciled with `actor` as the
    /// issuer. The caller must have authorized the actor already.
    pub fn apply_update(
        &self,
        subject: &ChatHandle,
        actor: &Account,
        params: &UpdateParams,
        now: DateTime<Utc>,
    ) -> AccountResult<UpdateReport> {
        let mut account = self
            .accounts
            .find_by_handle(subject)?
            .ok_or_else(|| AccountError::NotFound(subject.to_string()))?;

        let mut wallet_updated = false;
        if let Some(wallet) = params.wallet {
            account.wallet = wallet;
            wallet_updated = true;
        }

        let role_outcome = match &params.role {
            None => RoleOutcome::NotRequested,
            Some(_) if account.founder => {
                warn!(subject = %account.handle, actor = %actor.handle,
                    "role change on protected first account ignored");
                RoleOutcome::ProtectedAccountIgnored
            }
            Some(identifier) => {
                let from = account.role;
                account.role = self.registry.resolve(identifier);
                RoleOutcome::Changed {
                    from,
                    to: account.role,
                }
            }
        };

        if wallet_updated || matches!(role_outcome, RoleOutcome::Changed { .. }) {
            self.accounts.update(&account)?;
        }

        let reconcile = match params.lunch_target {
            Some(target) => Some(self.ledger.reconcile(&account.id, actor, target, now)?),
            None => None,
        };

        Ok(UpdateReport {
            wallet_updated,
            role_outcome,
            reconcile,
        })
    }

    /// Wallet + active-lunch snapshot for one user.
    pub fn balance_summary(
        &self,
        handle: &ChatHandle,
        now: DateTime<Utc>,
    ) -> AccountResult<BalanceSummary> {
        let account = self
            .accounts
            .find_by_handle(handle)?
            .ok_or_else(|| AccountError::NotFound(handle.to_string()))?;
        let active_lunches = self.ledger.active_count(&account.id, now)?;

        Ok(BalanceSummary {
            display_name: account.display_name.clone(),
            wallet: account.wallet,
            wallet_with_currency: account.wallet.with_currency(&self.config.currency_prefix),
            wallet_status: account.wallet.status(),
            active_lunches,
        })
    }

    /// Look up an active account.
    pub fn find(&self, handle: &ChatHandle) -> AccountResult<Option<Account>> {
        Ok(self.accounts.find_by_handle(handle)?)
    }

    /// Active accounts matching the query.
    pub fn list(&self, query: &AccountQuery) -> AccountResult<Vec<Account>> {
        Ok(self.accounts.list(query)?)
    }

    /// Soft-delete an account. Its grants stay in place for audit.
    pub fn remove(&self, handle: &ChatHandle, now: DateTime<Utc>) -> AccountResult<()> {
        let account = self
            .accounts
            .find_by_handle(handle)?
            .ok_or_else(|| AccountError::NotFound(handle.to_string()))?;
        self.accounts.remove(&account.id, now)?;
        info!(%handle, "account removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canteen_ledger::ReconcileOutcome;
    use canteen_types::RoleRank;

    fn handle(raw: &str) -> ChatHandle {
        ChatHandle::new(raw).unwrap()
    }

    fn service_with_users() -> (AccountService<InMemoryStore, InMemoryStore>, Account, Account) {
        let service = AccountService::in_memory();
        let now = Utc::now();
        let founder = service.register(handle("U1"), "Founder", now).unwrap();
        let member = service.register(handle("U2"), "Member", now).unwrap();
        (service, founder, member)
    }

    #[test]
    fn first_account_is_promoted_exactly_once() {
        let (service, founder, member) = service_with_users();
        assert!(founder.founder);
        assert_eq!(founder.role, RoleRank(10000));
        assert!(!member.founder);
        assert_eq!(member.role, RoleRank(1));

        // Removing the founder must not re-arm the promotion.
        service.remove(&handle("U1"), Utc::now()).unwrap();
        let third = service.register(handle("U3"), "Third", Utc::now()).unwrap();
        assert!(!third.founder);
        assert_eq!(third.role, RoleRank(1));
    }

    #[test]
    fn duplicate_handle_is_rejected() {
        let (service, _, _) = service_with_users();
        let err = service
            .register(handle("U2"), "Impostor", Utc::now())
            .unwrap_err();
        assert!(matches!(err, AccountError::HandleTaken(_)));
    }

    #[test]
    fn wallet_update_keeps_exact_value() {
        let (service, founder, _) = service_with_users();
        let now = Utc::now();
        let params = UpdateParams::wallet(WalletAmount::new(123.456).unwrap());
        let report = service
            .apply_update(&handle("U2"), &founder, &params, now)
            .unwrap();
        assert!(report.wallet_updated);

        let account = service.find(&handle("U2")).unwrap().unwrap();
        assert_eq!(account.wallet.get(), 123.456);
        assert_eq!(account.wallet.to_string(), "123.46");
    }

    #[test]
    fn explicit_zero_wallet_is_applied_not_dropped() {
        let (service, founder, _) = service_with_users();
        let now = Utc::now();
        service
            .apply_update(
                &handle("U2"),
                &founder,
                &UpdateParams::wallet(WalletAmount::new(50.0).unwrap()),
                now,
            )
            .unwrap();
        service
            .apply_update(
                &handle("U2"),
                &founder,
                &UpdateParams::wallet(WalletAmount::ZERO),
                now,
            )
            .unwrap();
        let account = service.find(&handle("U2")).unwrap().unwrap();
        assert_eq!(account.wallet, WalletAmount::ZERO);
    }

    #[test]
    fn absent_wallet_is_left_alone() {
        let (service, founder, _) = service_with_users();
        let now = Utc::now();
        service
            .apply_update(
                &handle("U2"),
                &founder,
                &UpdateParams::wallet(WalletAmount::new(75.0).unwrap()),
                now,
            )
            .unwrap();
        let report = service
            .apply_update(&handle("U2"), &founder, &UpdateParams::lunch_target(1), now)
            .unwrap();
        assert!(!report.wallet_updated);
        let account = service.find(&handle("U2")).unwrap().unwrap();
        assert_eq!(account.wallet.get(), 75.0);
    }

    #[test]
    fn role_update_resolves_names() {
        let (service, founder, _) = service_with_users();
        let report = service
            .apply_update(
                &handle("U2"),
                &founder,
                &UpdateParams::role("manager"),
                Utc::now(),
            )
            .unwrap();
        assert_eq!(
            report.role_outcome,
            RoleOutcome::Changed {
                from: RoleRank(1),
                to: RoleRank(100)
            }
        );
        let account = service.find(&handle("U2")).unwrap().unwrap();
        assert_eq!(account.role, RoleRank(100));
    }

    #[test]
    fn founder_role_is_immutable_and_reported() {
        let (service, _, member) = service_with_users();
        let report = service
            .apply_update(
                &handle("U1"),
                &member,
                &UpdateParams::role("User"),
                Utc::now(),
            )
            .unwrap();
        assert_eq!(report.role_outcome, RoleOutcome::ProtectedAccountIgnored);
        let account = service.find(&handle("U1")).unwrap().unwrap();
        assert_eq!(account.role, RoleRank(10000));
    }

    #[test]
    fn founder_wallet_is_still_updatable() {
        let (service, founder, _) = service_with_users();
        let params = UpdateParams {
            wallet: Some(WalletAmount::new(300.0).unwrap()),
            role: Some("User".into()),
            lunch_target: None,
        };
        let report = service
            .apply_update(&handle("U1"), &founder, &params, Utc::now())
            .unwrap();
        assert!(report.wallet_updated);
        assert_eq!(report.role_outcome, RoleOutcome::ProtectedAccountIgnored);
        let account = service.find(&handle("U1")).unwrap().unwrap();
        assert_eq!(account.wallet.get(), 300.0);
        assert_eq!(account.role, RoleRank(10000));
    }

    #[test]
    fn lunch_target_reconciles_with_actor_attribution() {
        let (service, founder, member) = service_with_users();
        let now = Utc::now();
        let report = service
            .apply_update(&handle("U2"), &founder, &UpdateParams::lunch_target(2), now)
            .unwrap();
        assert_eq!(report.reconcile, Some(ReconcileOutcome::Issued { count: 2 }));
        assert_eq!(
            service.ledger().active_count(&member.id, now).unwrap(),
            2
        );
        assert_eq!(
            service.balance_summary(&handle("U2"), now).unwrap().active_lunches,
            2
        );
    }

    #[test]
    fn explicit_zero_lunch_target_clears_grants() {
        let (service, founder, member) = service_with_users();
        let now = Utc::now();
        service
            .apply_update(&handle("U2"), &founder, &UpdateParams::lunch_target(3), now)
            .unwrap();
        let report = service
            .apply_update(&handle("U2"), &founder, &UpdateParams::lunch_target(0), now)
            .unwrap();
        assert_eq!(
            report.reconcile,
            Some(ReconcileOutcome::ClearedAll { removed: 3 })
        );
        assert_eq!(service.ledger().active_count(&member.id, now).unwrap(), 0);
    }

    #[test]
    fn authorize_is_a_threshold_check() {
        let (service, founder, member) = service_with_users();
        assert!(service.authorize(&founder, &"Manager".into()));
        assert!(!service.authorize(&member, &"Manager".into()));
        // Unresolvable requirement denies even the founder.
        assert!(!service.authorize(&founder, &"Janitor".into()));
    }

    #[test]
    fn balance_summary_snapshot() {
        let (service, founder, _) = service_with_users();
        let now = Utc::now();
        service
            .apply_update(
                &handle("U2"),
                &founder,
                &UpdateParams {
                    wallet: Some(WalletAmount::new(1234.5).unwrap()),
                    role: None,
                    lunch_target: Some(1),
                },
                now,
            )
            .unwrap();

        let summary = service.balance_summary(&handle("U2"), now).unwrap();
        assert_eq!(summary.display_name, "Member");
        assert_eq!(summary.wallet_with_currency, "NGN1234.50");
        assert_eq!(summary.wallet_status, WalletStatus::Healthy);
        assert_eq!(summary.active_lunches, 1);
    }

    #[test]
    fn removed_account_is_gone_from_the_service_surface() {
        let (service, founder, _) = service_with_users();
        let now = Utc::now();
        service.remove(&handle("U2"), now).unwrap();

        assert!(service.find(&handle("U2")).unwrap().is_none());
        let err = service
            .apply_update(&handle("U2"), &founder, &UpdateParams::lunch_target(1), now)
            .unwrap_err();
        assert!(matches!(err, AccountError::NotFound(_)));
    }

    #[test]
    fn update_on_unknown_handle_fails() {
        let (service, founder, _) = service_with_users();
        let err = service
            .apply_update(
                &handle("UX"),
                &founder,
                &UpdateParams::default(),
                Utc::now(),
            )
            .unwrap_err();
        assert!(matches!(err, AccountError::NotFound(_)));
    }
}
