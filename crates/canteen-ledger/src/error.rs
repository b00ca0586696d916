use canteen_store::StoreError;
use canteen_types::{GrantId, TypeError};

/// Errors produced by ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("grant not found: {0}")]
    GrantNotFound(GrantId),

    #[error("grant state error: {0}")]
    Grant(#[from] TypeError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
