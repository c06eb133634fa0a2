//! The response shape every Tool Base produces, before the Dispatcher
//! wraps it in the outer `{success, error, metadata}` envelope of spec §6.

use uuid::Uuid;

/// Token accounting for one tool invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt.
    pub input: u32,
    /// Tokens consumed by the completion.
    pub output: u32,
}

/// What a Tool Base hands back to the dispatcher on success.
#[derive(Debug, Clone)]
pub struct ToolResponse {
    /// Generated or synthesized content.
    pub content: String,
    /// Thread ID a caller may pass as `continuation_id` on a follow-up
    /// call, per spec §8 property 1.
    pub continuation_id: Uuid,
    /// Canonical model name that answered the call (the primary model,
    /// not an expert-validation model).
    pub model_used: String,
    /// Token accounting for the primary call.
    pub tokens: TokenUsage,
    /// Tool-specific structured metadata (e.g. workflow step/confidence,
    /// expert-validation outcome, thread-recovery warnings).
    pub metadata: serde_json::Value,
}
