use canteen_types::{AccountId, GrantId};

/// Errors from account/grant store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The referenced account row does not exist.
    #[error("account not found: {0}")]
    AccountNotFound(AccountId),

    /// The referenced grant row does not exist.
    #[error("grant not found: {0}")]
    GrantNotFound(GrantId),

    /// Another account already owns this chat handle.
    #[error("chat handle already registered: {0}")]
    DuplicateHandle(String),

    /// An insert collided with an existing row id.
    #[error("duplicate row id")]
    DuplicateId,

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific failure (connection loss, constraint violation).
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
