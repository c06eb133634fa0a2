//! Capability Descriptor (C1) and provider-type tagging.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Tag identifying which vendor backend owns a [`CapabilityDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderType {
    /// OpenAI-compatible API.
    OpenAi,
    /// Anthropic-compatible API.
    Anthropic,
    /// Google Gemini API.
    Google,
    /// Any other vendor, named explicitly. Keeps the registry open to
    /// backends not known at compile time without requiring a recompile.
    Custom {
        /// Vendor name, e.g. `"together"`.
        name: String,
    },
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenAi => write!(f, "openai"),
            Self::Anthropic => write!(f, "anthropic"),
            Self::Google => write!(f, "google"),
            Self::Custom { name } => write!(f, "{name}"),
        }
    }
}

/// Immutable, per-model metadata declared by a provider at construction
/// time. See spec §3 "Capability Descriptor (C1)".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CapabilityDescriptor {
    /// Canonical model name, unique within the owning provider.
    pub model_name: String,
    /// Human-friendly display name.
    pub friendly_name: String,
    /// Case-insensitive aliases. Unique within the owning provider; across
    /// providers the first-registered provider wins a collision.
    pub aliases: BTreeSet<String>,
    /// Total context window, in tokens.
    pub context_window_tokens: u32,
    /// Maximum output tokens the model will produce in one call.
    pub max_output_tokens: u32,
    /// Feature flags.
    pub features: FeatureFlags,
    /// Maximum accepted image payload size in bytes; `0` if images are
    /// unsupported.
    pub max_image_bytes: u64,
    /// Intelligence rank used by auto-mode selection, in `[1, 20]`.
    pub intelligence_score: u8,
    /// Whether this model may be used for code-generation tasks.
    pub allow_code_generation: bool,
    /// Owning provider tag.
    pub provider_type: ProviderType,
}

/// Per-model feature flags referenced by category filtering and by the
/// provider's `generate` contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FeatureFlags {
    /// Model supports an extended/visible "thinking" mode.
    pub supports_extended_thinking: bool,
    /// Model accepts a system prompt distinct from the first user turn.
    pub supports_system_prompts: bool,
    /// Model can stream partial output.
    pub supports_streaming: bool,
    /// Model supports function/tool calling.
    pub supports_function_calling: bool,
    /// Model supports constrained JSON-mode output.
    pub supports_json_mode: bool,
    /// Model accepts image inputs.
    pub supports_images: bool,
    /// Model accepts a `temperature` sampling parameter.
    pub supports_temperature: bool,
}

/// Error returned when a [`CapabilityDescriptor`] is constructed with
/// inconsistent fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    /// `max_output_tokens` exceeded `context_window_tokens`.
    #[error(
        "max_output_tokens ({max_output_tokens}) exceeds context_window_tokens ({context_window_tokens})"
    )]
    OutputExceedsContext {
        /// The offending `max_output_tokens` value.
        max_output_tokens: u32,
        /// The offending `context_window_tokens` value.
        context_window_tokens: u32,
    },
    /// `intelligence_score` was outside the valid `[1, 20]` range.
    #[error("intelligence_score {0} out of range [1, 20]")]
    IntelligenceScoreOutOfRange(u8),
}

/// Fluent builder for [`CapabilityDescriptor`], validating invariants at
/// `build()` rather than on every field assignment.
#[derive(Debug, Clone)]
pub struct CapabilityDescriptorBuilder {
    model_name: String,
    friendly_name: String,
    aliases: BTreeSet<String>,
    context_window_tokens: u32,
    max_output_tokens: u32,
    features: FeatureFlags,
    max_image_bytes: u64,
    intelligence_score: u8,
    allow_code_generation: bool,
    provider_type: ProviderType,
}

impl CapabilityDescriptorBuilder {
    /// Start a new builder for the given canonical model name and owning
    /// provider.
    #[must_use]
    pub fn new(model_name: impl Into<String>, provider_type: ProviderType) -> Self {
        Self {
            model_name: model_name.into(),
            friendly_name: String::new(),
            aliases: BTreeSet::new(),
            context_window_tokens: 0,
            max_output_tokens: 0,
            features: FeatureFlags::default(),
            max_image_bytes: 0,
            intelligence_score: 0,
            allow_code_generation: false,
            provider_type,
        }
    }

    /// Set the friendly display name.
    #[must_use]
    pub fn friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = name.into();
        self
    }

    /// Add a case-insensitive alias (stored lower-cased).
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.insert(alias.into().to_lowercase());
        self
    }

    /// Set the context window, in tokens.
    #[must_use]
    pub fn context_window_tokens(mut self, n: u32) -> Self {
        self.context_window_tokens = n;
        self
    }

    /// Set the max output tokens.
    #[must_use]
    pub fn max_output_tokens(mut self, n: u32) -> Self {
        self.max_output_tokens = n;
        self
    }

    /// Set the feature flags.
    #[must_use]
    pub fn features(mut self, features: FeatureFlags) -> Self {
        self.features = features;
        self
    }

    /// Set the max accepted image payload size in bytes.
    #[must_use]
    pub fn max_image_bytes(mut self, n: u64) -> Self {
        self.max_image_bytes = n;
        self
    }

    /// Set the intelligence score, expected in `[1, 20]`.
    #[must_use]
    pub fn intelligence_score(mut self, score: u8) -> Self {
        self.intelligence_score = score;
        self
    }

    /// Allow or disallow code-generation use of this model.
    #[must_use]
    pub fn allow_code_generation(mut self, allow: bool) -> Self {
        self.allow_code_generation = allow;
        self
    }

    /// Validate and construct the descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError`] if `max_output_tokens` exceeds
    /// `context_window_tokens`, or if `intelligence_score` is outside
    /// `[1, 20]`.
    pub fn build(self) -> Result<CapabilityDescriptor, DescriptorError> {
        if self.max_output_tokens > self.context_window_tokens {
            return Err(DescriptorError::OutputExceedsContext {
                max_output_tokens: self.max_output_tokens,
                context_window_tokens: self.context_window_tokens,
            });
        }
        if !(1..=20).contains(&self.intelligence_score) {
            return Err(DescriptorError::IntelligenceScoreOutOfRange(
                self.intelligence_score,
            ));
        }
        Ok(CapabilityDescriptor {
            model_name: self.model_name,
            friendly_name: self.friendly_name,
            aliases: self.aliases,
            context_window_tokens: self.context_window_tokens,
            max_output_tokens: self.max_output_tokens,
            features: self.features,
            max_image_bytes: self.max_image_bytes,
            intelligence_score: self.intelligence_score,
            allow_code_generation: self.allow_code_generation,
            provider_type: self.provider_type,
        })
    }
}
