//! aiorc-config
#![deny(unsafe_code)]
#![warn(missing_docs)]
//!
//! Static configuration loading for the orchestration server: registered
//! providers and their credential environment-variable names, each
//! provider's capability-descriptor catalog, the restriction policy, and
//! the per-category timeout table. See spec §6 "Provider configuration",
//! "Capability configuration", "Restriction policy", and §5 "Timeouts".

use aiorc_core::{CapabilityDescriptor, CapabilityDescriptorBuilder, DescriptorError, FeatureFlags, ProviderType};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Errors that can occur loading or validating a [`Config`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The requested configuration file was not found or unreadable.
    #[error("config file not found or unreadable: {path}")]
    FileNotFound {
        /// Path that was requested.
        path: String,
    },
    /// The file could not be parsed as valid TOML.
    #[error("failed to parse config: {reason}")]
    ParseError {
        /// Human-readable parse error detail.
        reason: String,
    },
    /// Semantic validation failed for one or more model descriptors.
    #[error("config validation failed: {reasons:?}")]
    ValidationError {
        /// Individual validation failure messages.
        reasons: Vec<String>,
    },
}

/// Advisory-level issues that do not prevent startup but deserve
/// attention, surfaced to logs at `warn!` rather than failing the
/// process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// A provider block declared no credential environment variable, so
    /// it is not registered (spec §6: "a provider with missing
    /// credentials is not registered").
    MissingCredentials {
        /// The provider's configuration key.
        provider: String,
    },
    /// A provider declared zero models.
    EmptyModelCatalog {
        /// The provider's configuration key.
        provider: String,
    },
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCredentials { provider } => {
                write!(f, "provider '{provider}' has no configured credential env var; not registering it")
            }
            Self::EmptyModelCatalog { provider } => {
                write!(f, "provider '{provider}' declares no models")
            }
        }
    }
}

/// One model's static descriptor, as declared in TOML. Mirrors
/// [`CapabilityDescriptor`] field-for-field so the mapping is a straight
/// builder call.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ModelConfig {
    /// Canonical model name.
    pub model_name: String,
    /// Human-friendly display name.
    #[serde(default)]
    pub friendly_name: String,
    /// Case-insensitive aliases.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Context window, in tokens.
    pub context_window_tokens: u32,
    /// Max output tokens.
    pub max_output_tokens: u32,
    /// Feature flags.
    #[serde(default)]
    pub features: FeatureFlags,
    /// Max accepted image payload in bytes.
    #[serde(default)]
    pub max_image_bytes: u64,
    /// Auto-mode intelligence rank, `[1, 20]`.
    pub intelligence_score: u8,
    /// Whether this model may be used for code generation.
    #[serde(default)]
    pub allow_code_generation: bool,
}

impl ModelConfig {
    /// Build the runtime [`CapabilityDescriptor`] this entry describes.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError`] if the entry's fields violate the
    /// descriptor's own invariants (output exceeding context, or an
    /// out-of-range intelligence score).
    pub fn to_descriptor(&self, provider_type: ProviderType) -> Result<CapabilityDescriptor, DescriptorError> {
        let mut builder = CapabilityDescriptorBuilder::new(self.model_name.clone(), provider_type)
            .friendly_name(self.friendly_name.clone())
            .context_window_tokens(self.context_window_tokens)
            .max_output_tokens(self.max_output_tokens)
            .features(self.features)
            .max_image_bytes(self.max_image_bytes)
            .intelligence_score(self.intelligence_score)
            .allow_code_generation(self.allow_code_generation);
        for alias in &self.aliases {
            builder = builder.alias(alias.clone());
        }
        builder.build()
    }
}

/// One provider block: which environment variable holds its credential,
/// and its static model catalog.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ProviderConfig {
    /// Name of the environment variable holding this provider's API
    /// credential. If unset at startup, the provider is not registered
    /// (spec §6).
    pub credential_env: String,
    /// This provider's static model catalog.
    #[serde(default)]
    pub models: Vec<ModelConfig>,
}

/// Restriction-policy configuration: allow/deny glob patterns matched
/// against a canonical model name or provider-type string (spec §6
/// "Restriction policy").
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct RestrictionConfig {
    /// Patterns that, if non-empty, are the only permitted candidates.
    #[serde(default)]
    pub allow: Vec<String>,
    /// Patterns that are always denied, taking precedence over `allow`.
    #[serde(default)]
    pub deny: Vec<String>,
}

/// Per-category wall-clock timeout, in seconds, applied to a
/// `provider.generate` call (spec §5 "Timeouts").
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct TimeoutConfig {
    /// Timeout for the `fast` category.
    #[serde(default = "default_fast_timeout")]
    pub fast_secs: u64,
    /// Timeout for `reasoning`.
    #[serde(default = "default_reasoning_timeout")]
    pub reasoning_secs: u64,
    /// Timeout for `coding`.
    #[serde(default = "default_reasoning_timeout")]
    pub coding_secs: u64,
    /// Timeout for `vision`.
    #[serde(default = "default_fast_timeout")]
    pub vision_secs: u64,
    /// Timeout for `long_context`.
    #[serde(default = "default_reasoning_timeout")]
    pub long_context_secs: u64,
    /// Timeout for `general`.
    #[serde(default = "default_fast_timeout")]
    pub general_secs: u64,
}

fn default_fast_timeout() -> u64 {
    60
}
fn default_reasoning_timeout() -> u64 {
    300
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            fast_secs: default_fast_timeout(),
            reasoning_secs: default_reasoning_timeout(),
            coding_secs: default_reasoning_timeout(),
            vision_secs: default_fast_timeout(),
            long_context_secs: default_reasoning_timeout(),
            general_secs: default_fast_timeout(),
        }
    }
}

/// Top-level static configuration for the orchestration server.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    /// Address the dispatcher's HTTP server binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Named provider blocks, keyed by a short provider tag
    /// (e.g. `"openai"`, `"anthropic"`, `"google"`).
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderConfig>,
    /// Restriction policy applied to explicit selection and auto-mode.
    #[serde(default)]
    pub restriction: RestrictionConfig,
    /// Per-category timeouts.
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}

impl Config {
    /// Load and validate a [`Config`] from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileNotFound`] if the file cannot be read,
    /// [`ConfigError::ParseError`] if it is not valid TOML, or
    /// [`ConfigError::ValidationError`] if any model entry fails
    /// [`ModelConfig::to_descriptor`]. Returns advisory
    /// [`ConfigWarning`]s alongside a successful load.
    pub fn load(path: &Path) -> Result<(Self, Vec<ConfigWarning>), ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        Self::parse(&raw)
    }

    /// Parse and validate a [`Config`] from an in-memory TOML document.
    ///
    /// # Errors
    ///
    /// As [`Self::load`], minus [`ConfigError::FileNotFound`].
    pub fn parse(raw: &str) -> Result<(Self, Vec<ConfigWarning>), ConfigError> {
        let config: Config = toml::from_str(raw).map_err(|e| ConfigError::ParseError { reason: e.to_string() })?;

        let mut reasons = Vec::new();
        let mut warnings = Vec::new();
        for (key, provider) in &config.providers {
            if provider.models.is_empty() {
                warnings.push(ConfigWarning::EmptyModelCatalog { provider: key.clone() });
            }
            let provider_type = ProviderType::Custom { name: key.clone() };
            for model in &provider.models {
                if let Err(e) = model.to_descriptor(provider_type.clone()) {
                    reasons.push(format!("provider '{key}' model '{}': {e}", model.model_name));
                }
            }
        }
        if !reasons.is_empty() {
            return Err(ConfigError::ValidationError { reasons });
        }

        Ok((config, warnings))
    }

    /// Resolve which configured providers have a credential present in
    /// the process environment. Returns the subset of `providers` whose
    /// `credential_env` variable is set, alongside a
    /// [`ConfigWarning::MissingCredentials`] for each that is not.
    #[must_use]
    pub fn providers_with_credentials(&self) -> (Vec<(&str, &ProviderConfig)>, Vec<ConfigWarning>) {
        let mut available = Vec::new();
        let mut warnings = Vec::new();
        for (key, provider) in &self.providers {
            if std::env::var(&provider.credential_env).is_ok() {
                available.push((key.as_str(), provider));
            } else {
                warnings.push(ConfigWarning::MissingCredentials { provider: key.clone() });
            }
        }
        (available, warnings)
    }
}
