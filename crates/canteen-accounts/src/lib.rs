//! Account service for the canteen system.
//!
//! The high-level entry point the (external) request-handling layer calls
//! into. It owns registration, wallet/role updates, and entitlement
//! targets, delegating grant reconciliation to `canteen-ledger` and role
//! resolution to `canteen-roles`.
//!
//! # Key Types
//!
//! - [`AccountService`] — the service facade over both stores
//! - [`UpdateParams`] — explicit three-state parameter struct (a field is
//!   absent or present-with-value; an explicit zero is applied, not dropped)
//! - [`UpdateReport`] — what an update actually did, including the
//!   explicit "role change ignored on the protected first account" outcome
//! - [`BalanceSummary`] — wallet + active-lunch snapshot for one user

pub mod error;
pub mod params;
pub mod service;

pub use error::{AccountError, AccountResult};
pub use params::{RoleOutcome, UpdateParams, UpdateReport};
pub use service::{AccountService, BalanceSummary, ServiceConfig};
