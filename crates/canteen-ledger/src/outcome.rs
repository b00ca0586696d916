use serde::{Deserialize, Serialize};

/// What a reconcile run did to the recipient's grant set.
///
/// The counts let callers and tests observe idempotence directly: a
/// reconcile that found the target already met reports [`Unchanged`] and
/// performed no store write.
///
/// [`Unchanged`]: ReconcileOutcome::Unchanged
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReconcileOutcome {
    /// Target was zero or negative: every grant row, active and inert, was
    /// hard-deleted.
    ClearedAll { removed: u64 },
    /// The active count was below target: this many grants were issued.
    Issued { count: u64 },
    /// The active count was above target: this many soonest-expiring
    /// active grants were hard-deleted.
    Revoked { count: u64 },
    /// The active count already matched the target: no write.
    Unchanged { active: u64 },
}

impl ReconcileOutcome {
    /// Whether the run performed any store write.
    pub fn wrote(&self) -> bool {
        !matches!(self, Self::Unchanged { .. })
    }
}
