//! Normalized provider response shape, common to every vendor backend.

use crate::capability::ProviderType;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Why a provider stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// The model reached a natural stopping point.
    Stop,
    /// The model hit `max_output_tokens`.
    Length,
    /// The model requested a function/tool call.
    ToolCalls,
    /// The provider's content filter intervened.
    ContentFilter,
    /// Any vendor-specific reason not covered above.
    Other(String),
}

/// Vendor-agnostic shape every caller of a provider's `generate` operation
/// observes, regardless of which vendor answered the call.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NormalizedResponse {
    /// Generated text content.
    pub content: String,
    /// Why generation stopped.
    pub finish_reason: FinishReason,
    /// Tokens consumed by the prompt.
    pub input_tokens: u32,
    /// Tokens consumed by the completion.
    pub output_tokens: u32,
    /// Canonical model name that answered the call.
    pub model_name: String,
    /// Provider that answered the call.
    pub provider_type: ProviderType,
    /// Opaque vendor-specific payload, preserved for callers that need it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_reason_round_trips_through_json() {
        let r = FinishReason::ToolCalls;
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v, serde_json::json!("tool_calls"));
        let back: FinishReason = serde_json::from_value(v).unwrap();
        assert_eq!(back, r);
    }
}
