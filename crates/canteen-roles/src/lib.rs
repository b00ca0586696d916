//! Role hierarchy for the canteen system.
//!
//! A fixed, ordered table of privilege tiers (rank → name), resolution of
//! either form back to a rank, and the threshold check used to authorize
//! actors. Roles are process-wide immutable configuration; nothing here has
//! a lifecycle beyond process start.
//!
//! Resolution is deliberately asymmetric:
//!
//! - an unknown **numeric** rank fails open to the lowest tier (an actor
//!   with a corrupt rank keeps least privilege rather than erroring), while
//! - an unknown **name** fails closed to the no-role sentinel, so a
//!   requirement that does not resolve denies everyone.

pub mod identifier;
pub mod registry;

pub use identifier::RoleIdentifier;
pub use registry::{RoleRegistry, RoleTier, NO_ROLE_NAME};
