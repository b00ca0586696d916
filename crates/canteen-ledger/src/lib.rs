//! Free-lunch entitlement ledger for the canteen system.
//!
//! This crate owns the one genuinely algorithmic piece of the entitlement
//! domain: reconciling a recipient's active-grant count to a target number.
//! It provides:
//! - [`EntitlementLedger`] — count + reconcile over a [`GrantStore`],
//!   serialized per recipient
//! - [`LedgerConfig`] — validity window and attribution text
//! - [`ReconcileOutcome`] — what a reconcile run actually did
//!
//! Authorization is **not** checked here; callers authorize the issuer
//! before invoking any mutation.
//!
//! [`GrantStore`]: canteen_store::GrantStore

pub mod config;
pub mod error;
pub mod ledger;
pub mod outcome;

pub use config::LedgerConfig;
pub use error::{LedgerError, LedgerResult};
pub use ledger::EntitlementLedger;
pub use outcome::ReconcileOutcome;
