//! The plain role/content message shape shared by prompt composition (C7/C8)
//! and history reconstruction (C5).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One message in a provider-bound prompt or a reconstructed history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Message {
    /// `"user"` or `"assistant"`.
    pub role: String,
    /// Message text.
    pub content: String,
}

impl Message {
    /// Construct a user-role message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".into(), content: content.into() }
    }

    /// Construct an assistant-role message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: "assistant".into(), content: content.into() }
    }
}
