//! aiorc-policy
#![deny(unsafe_code)]
#![warn(missing_docs)]
//!
//! Restriction policy for model selection (spec §6 "Restriction policy"):
//! a configured allow-list filters `select_auto` candidates and may block
//! an explicit model selection, by matching either the canonical model
//! name or the owning provider's type string against glob patterns.
//! Deny takes precedence over allow, mirroring the teacher's tool/path
//! policy engine.

use aiorc_core::ProviderType;
use aiorc_glob::build_globset;
use anyhow::Result;
use globset::GlobSet;

/// The outcome of a restriction check, with a human-readable reason when
/// denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Whether the candidate is permitted.
    pub allowed: bool,
    /// Populated when `allowed` is `false`.
    pub reason: Option<String>,
}

impl Decision {
    /// Construct an allowing decision.
    #[must_use]
    pub fn allow() -> Self {
        Self { allowed: true, reason: None }
    }

    /// Construct a denying decision with a reason.
    #[must_use]
    pub fn deny(reason: impl Into<String>) -> Self {
        Self { allowed: false, reason: Some(reason.into()) }
    }
}

/// Compiled allow/deny glob rules, checked against both a model's
/// canonical name and its provider-type string. An empty policy (no allow
/// and no deny patterns) permits every model.
#[derive(Debug, Clone)]
pub struct RestrictionPolicy {
    allow: Option<GlobSet>,
    deny: Option<GlobSet>,
}

impl RestrictionPolicy {
    /// Compile an allow-list and a deny-list of glob patterns. Patterns
    /// may name a canonical model (`"gpt-5"`, `"gpt-*"`) or a provider
    /// type (`"openai"`, `"anthropic"`).
    ///
    /// # Errors
    ///
    /// Returns an error if any pattern fails to compile.
    pub fn new(allow: &[String], deny: &[String]) -> Result<Self> {
        Ok(Self {
            allow: build_globset(allow)?,
            deny: build_globset(deny)?,
        })
    }

    /// An empty policy: every model is permitted.
    #[must_use]
    pub fn unrestricted() -> Self {
        Self { allow: None, deny: None }
    }

    /// Decide whether `model_name`/`provider_type` may be used, either as
    /// an explicit selection or as an auto-mode candidate.
    #[must_use]
    pub fn check(&self, model_name: &str, provider_type: &ProviderType) -> Decision {
        let provider_key = provider_type.to_string();
        let candidates = [model_name, provider_key.as_str()];

        if let Some(deny) = &self.deny
            && candidates.iter().any(|c| deny.is_match(c))
        {
            return Decision::deny(format!(
                "model '{model_name}' (provider '{provider_key}') is denied by restriction policy"
            ));
        }

        if let Some(allow) = &self.allow
            && !candidates.iter().any(|c| allow.is_match(c))
        {
            return Decision::deny(format!(
                "model '{model_name}' (provider '{provider_key}') is not in the restriction allow-list"
            ));
        }

        Decision::allow()
    }
}
