//! Foundation types for the canteen system.
//!
//! This crate provides the identity, monetary, and entitlement record types
//! used throughout canteen. Every other canteen crate depends on
//! `canteen-types`.
//!
//! # Key Types
//!
//! - [`AccountId`] / [`GrantId`] — UUID v7 identifiers
//! - [`ChatHandle`] — unique external chat-platform identifier for a user
//! - [`RoleRank`] — numeric privilege rank (higher rank, higher privilege)
//! - [`WalletAmount`] — non-negative currency amount with 2-decimal display
//! - [`Account`] — a user row: handle, wallet, role, soft-delete lifecycle
//! - [`LunchGrant`] — a time-bounded, single-use free-lunch entitlement

pub mod account;
pub mod error;
pub mod grant;
pub mod handle;
pub mod id;
pub mod money;
pub mod rank;

pub use account::Account;
pub use error::TypeError;
pub use grant::LunchGrant;
pub use handle::ChatHandle;
pub use id::{AccountId, GrantId};
pub use money::{WalletAmount, WalletStatus};
pub use rank::RoleRank;
