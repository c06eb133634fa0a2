//! Task categories used by auto-mode model selection.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Coarse task class used by [`crate::capability::CapabilityDescriptor`]
/// auto-mode selection to filter candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Low-latency, low-cost tasks.
    Fast,
    /// Tasks benefiting from deeper chain-of-thought reasoning.
    Reasoning,
    /// Code generation and review tasks.
    Coding,
    /// Tasks requiring image understanding.
    Vision,
    /// Tasks requiring a very large context window.
    LongContext,
    /// No particular specialization required.
    General,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Fast => "fast",
            Self::Reasoning => "reasoning",
            Self::Coding => "coding",
            Self::Vision => "vision",
            Self::LongContext => "long_context",
            Self::General => "general",
        };
        f.write_str(s)
    }
}
