//! Storage boundary for the canteen system.
//!
//! This crate defines the trait seams the core logic talks through and an
//! in-memory implementation for tests, demos, and embedding:
//! - [`AccountStore`] — point lookup by chat handle, single-row update,
//!   soft delete, filtered/sorted listing
//! - [`GrantStore`] — active-grant selection ordered by expiry, atomic
//!   batch insert and batch delete
//! - [`InMemoryStore`] — `RwLock`-guarded maps implementing both traits
//!
//! Every trait call executes as one atomic unit: a failed batch leaves the
//! store unchanged.

pub mod error;
pub mod memory;
pub mod query;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use query::{AccountQuery, AccountSort, SortDirection};
pub use traits::{AccountStore, GrantStore};
