use thiserror::Error;

/// Errors produced by type constructors and state transitions.
#[derive(Debug, Error, PartialEq)]
pub enum TypeError {
    #[error("wallet amount must be non-negative, got {0}")]
    NegativeAmount(f64),

    #[error("wallet amount must be finite, got {0}")]
    NonFiniteAmount(f64),

    #[error("chat handle must not be empty")]
    EmptyHandle,

    #[error("grant already redeemed")]
    AlreadyRedeemed,

    #[error("grant expired at {0}")]
    GrantExpired(chrono::DateTime<chrono::Utc>),
}
