use canteen_ledger::LedgerError;
use canteen_store::StoreError;
use canteen_types::TypeError;

/// Errors produced by the account service.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("no active account for handle {0}")]
    NotFound(String),

    #[error("chat handle already registered: {0}")]
    HandleTaken(String),

    #[error("invalid value: {0}")]
    InvalidValue(#[from] TypeError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// Result alias for account service operations.
pub type AccountResult<T> = Result<T, AccountError>;
