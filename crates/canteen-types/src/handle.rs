use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Unique external chat-platform identifier for a user (a Slack user id in
/// the reference deployment, e.g. `U024BE7LH`).
///
/// Handles are matched exactly and case-sensitively; the chat platform owns
/// their format and canteen treats them as opaque.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChatHandle(String);

impl ChatHandle {
    /// Create a handle. The only local rule is non-emptiness.
    pub fn new(raw: impl Into<String>) -> Result<Self, TypeError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(TypeError::EmptyHandle);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ChatHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChatHandle({})", self.0)
    }
}

impl fmt::Display for ChatHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
