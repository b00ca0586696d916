use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric privilege rank.
///
/// Ranks are totally ordered and higher rank strictly implies higher
/// privilege. Rank `0` is the no-role sentinel: it names no tier and never
/// satisfies any requirement. The registered tiers live in `canteen-roles`;
/// this type only carries the number.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct RoleRank(pub u32);

impl RoleRank {
    /// The no-role sentinel.
    pub const NONE: Self = Self(0);

    pub fn get(self) -> u32 {
        self.0
    }

    /// Returns `true` if this rank names an actual tier (nonzero).
    pub fn is_some_role(self) -> bool {
        self.0 != 0
    }
}

impl From<u32> for RoleRank {
    fn from(rank: u32) -> Self {
        Self(rank)
    }
}

impl fmt::Display for RoleRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
