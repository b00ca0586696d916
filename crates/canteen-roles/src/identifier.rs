use std::fmt;

use serde::{Deserialize, Serialize};

use canteen_types::RoleRank;

/// Either form a caller may use to name a role.
///
/// External inputs (chat commands, admin forms) address roles by number or
/// by display name interchangeably; the two forms resolve with different
/// fallback behavior, so the distinction is kept explicit instead of being
/// collapsed by a cast.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleIdentifier {
    /// A numeric rank, e.g. `1000`.
    Rank(u32),
    /// A role name, matched case-insensitively, e.g. `"Admin"`.
    Name(String),
}

impl RoleIdentifier {
    /// Parse raw caller input: digits become a rank, anything else a name.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.parse::<u32>() {
            Ok(rank) => Self::Rank(rank),
            Err(_) => Self::Name(trimmed.to_string()),
        }
    }
}

impl From<u32> for RoleIdentifier {
    fn from(rank: u32) -> Self {
        Self::Rank(rank)
    }
}

impl From<RoleRank> for RoleIdentifier {
    fn from(rank: RoleRank) -> Self {
        Self::Rank(rank.get())
    }
}

impl From<&str> for RoleIdentifier {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for RoleIdentifier {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl fmt::Display for RoleIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rank(rank) => write!(f, "{rank}"),
            Self::Name(name) => write!(f, "{name}"),
        }
    }
}
