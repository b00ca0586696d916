use serde::{Deserialize, Serialize};
use tracing::debug;

use canteen_types::RoleRank;

use crate::identifier::RoleIdentifier;

/// Name returned for a rank that names no registered tier.
pub const NO_ROLE_NAME: &str = "N/A";

/// The built-in privilege ladder. Ordered ascending; ranks are unique and
/// names must stay unique — `resolve` takes the last name match, so a
/// duplicate would shadow earlier entries.
const BUILTIN_TIERS: &[(u32, &str)] = &[
    (1, "User"),
    (10, "Elevated User"),
    (100, "Manager"),
    (1000, "Admin"),
    (10000, "Super Admin"),
];

/// One rank/name pair in the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleTier {
    pub rank: RoleRank,
    pub name: String,
}

/// Fixed, ordered mapping from numeric rank to role name.
///
/// The registry answers three questions: what rank does an identifier
/// resolve to, what is a rank called, and does an actor's rank satisfy a
/// required threshold. It never mutates after construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRegistry {
    tiers: Vec<RoleTier>,
}

impl RoleRegistry {
    /// The standard five-tier ladder: User < Elevated User < Manager <
    /// Admin < Super Admin.
    pub fn builtin() -> Self {
        Self::from_tiers(
            BUILTIN_TIERS
                .iter()
                .map(|(rank, name)| RoleTier {
                    rank: RoleRank(*rank),
                    name: (*name).to_string(),
                })
                .collect(),
        )
    }

    /// Build from an explicit tier list. Callers must keep names unique.
    pub fn from_tiers(tiers: Vec<RoleTier>) -> Self {
        Self { tiers }
    }

    pub fn tiers(&self) -> &[RoleTier] {
        &self.tiers
    }

    /// The least-privileged registered rank.
    pub fn lowest_rank(&self) -> RoleRank {
        self.tiers
            .iter()
            .map(|tier| tier.rank)
            .min()
            .unwrap_or(RoleRank::NONE)
    }

    /// The most-privileged registered rank.
    pub fn highest_rank(&self) -> RoleRank {
        self.tiers
            .iter()
            .map(|tier| tier.rank)
            .max()
            .unwrap_or(RoleRank::NONE)
    }

    /// Resolve either identifier form to a rank.
    ///
    /// Numeric input that matches a registered rank passes through
    /// unchanged; an unknown number falls back to the lowest tier. Name
    /// input scans case-insensitively and resolves to [`RoleRank::NONE`]
    /// when nothing matches. The two fallbacks are intentionally different
    /// and must not be unified.
    pub fn resolve(&self, identifier: &RoleIdentifier) -> RoleRank {
        match identifier {
            RoleIdentifier::Rank(rank) => {
                if self.tiers.iter().any(|tier| tier.rank.get() == *rank) {
                    RoleRank(*rank)
                } else {
                    let lowest = self.lowest_rank();
                    debug!(rank, fallback = lowest.get(), "unknown numeric rank");
                    lowest
                }
            }
            RoleIdentifier::Name(name) => {
                // Linear scan without early exit: on a duplicate name the
                // last registered tier wins.
                let mut resolved = RoleRank::NONE;
                for tier in &self.tiers {
                    if tier.name.eq_ignore_ascii_case(name) {
                        resolved = tier.rank;
                    }
                }
                resolved
            }
        }
    }

    /// The registered name for a rank, or [`NO_ROLE_NAME`].
    pub fn name_of(&self, rank: RoleRank) -> &str {
        self.tiers
            .iter()
            .find(|tier| tier.rank == rank)
            .map(|tier| tier.name.as_str())
            .unwrap_or(NO_ROLE_NAME)
    }

    /// Threshold authorization check.
    ///
    /// True iff `required` resolves to an actual tier AND the actor's rank
    /// (itself re-resolved through the numeric path, so a corrupt stored
    /// rank degrades to least privilege) meets or exceeds it. An
    /// unresolvable requirement denies everyone, including the top tier.
    pub fn satisfies(&self, actor: RoleRank, required: &RoleIdentifier) -> bool {
        let required = self.resolve(required);
        if !required.is_some_role() {
            return false;
        }
        let actor = self.resolve(&RoleIdentifier::Rank(actor.get()));
        actor >= required
    }
}

impl Default for RoleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
