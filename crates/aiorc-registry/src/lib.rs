//! aiorc-registry
#![deny(unsafe_code)]
#![warn(missing_docs)]
//!
//! Provider Registry (spec §3/§4.2, component C3): maps logical model
//! names and aliases to the provider that serves them, and performs
//! auto-mode selection by task category and intelligence score.
//!
//! Mutated only during process startup via [`ProviderRegistry::register`];
//! thereafter every read is a plain slice/map lookup with no locking, per
//! spec §5's "written once during startup, thereafter read-only"
//! discipline.

use aiorc_capability::satisfies_category;
use aiorc_core::{Category, ProviderType};
use aiorc_error::{DispatchError, ErrorKind};
use aiorc_policy::RestrictionPolicy;
use aiorc_provider::Provider;
use std::sync::Arc;
use tracing::warn;

/// An ordered collection of registered providers, supporting case-insensitive
/// canonical/alias resolution and capability-filtered auto-mode selection.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn Provider>>,
}

impl ProviderRegistry {
    /// Construct an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { providers: Vec::new() }
    }

    /// Register a provider. Idempotent by provider type: if a provider of
    /// the same [`ProviderType`] is already registered, this is a no-op
    /// and the first registration continues to own that type.
    pub fn register(&mut self, provider: Arc<dyn Provider>) {
        let provider_type = provider.provider_type();
        if self.providers.iter().any(|p| p.provider_type() == provider_type) {
            warn!(%provider_type, "provider type already registered; ignoring duplicate registration");
            return;
        }
        self.providers.push(provider);
    }

    /// Resolve a model name or alias to its owning provider and canonical
    /// name. Case-insensitive. Resolution order: (1) exact canonical
    /// match on any provider, (2) alias match, first-registered provider
    /// wins.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::UnknownModel`] if neither a canonical nor an
    /// alias match is found.
    pub fn resolve(&self, model_or_alias: &str) -> Result<(Arc<dyn Provider>, String), DispatchError> {
        let needle = model_or_alias.to_lowercase();

        for provider in &self.providers {
            for descriptor in provider.descriptors() {
                if descriptor.model_name.to_lowercase() == needle {
                    return Ok((Arc::clone(provider), descriptor.model_name.clone()));
                }
            }
        }

        for provider in &self.providers {
            for descriptor in provider.descriptors() {
                if descriptor.aliases.contains(&needle) {
                    return Ok((Arc::clone(provider), descriptor.model_name.clone()));
                }
            }
        }

        Err(DispatchError::new(
            ErrorKind::UnknownModel,
            format!("no provider registered for model or alias '{model_or_alias}'"),
        ))
    }

    /// Every canonical model name served by a registered provider, in
    /// registration order.
    #[must_use]
    pub fn list_available(&self) -> Vec<String> {
        self.providers
            .iter()
            .flat_map(|p| p.descriptors().iter().map(|d| d.model_name.clone()))
            .collect()
    }

    /// Every descriptor served by a registered provider, for the model
    /// catalog surface (spec §6 "Model catalog interface").
    #[must_use]
    pub fn list_descriptors(&self) -> Vec<aiorc_core::CapabilityDescriptor> {
        self.providers.iter().flat_map(|p| p.descriptors().iter().cloned()).collect()
    }

    /// Select the highest-ranked model eligible for `category`, filtered
    /// by restriction policy. Ties in `intelligence_score` are broken by
    /// larger `context_window_tokens`, then by canonical name
    /// (lexicographic, stable).
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::NoEligibleModel`] if no registered descriptor
    /// passes the category and restriction filters.
    pub fn select_auto(
        &self,
        category: Category,
        restrictions: &RestrictionPolicy,
    ) -> Result<String, DispatchError> {
        let mut best: Option<(&str, u8, u32, ProviderType)> = None;

        for provider in &self.providers {
            let provider_type = provider.provider_type();
            for descriptor in provider.descriptors() {
                if !satisfies_category(&descriptor.features, category) {
                    continue;
                }
                if !restrictions.check(&descriptor.model_name, &provider_type).allowed {
                    continue;
                }

                let candidate = (
                    descriptor.model_name.as_str(),
                    descriptor.intelligence_score,
                    descriptor.context_window_tokens,
                    provider_type.clone(),
                );

                best = Some(match best {
                    None => candidate,
                    Some(current) => pick_better(current, candidate),
                });
            }
        }

        best.map(|(name, ..)| name.to_string()).ok_or_else(|| {
            DispatchError::new(
                ErrorKind::NoEligibleModel,
                format!("no model satisfies category '{category}' under the current restriction policy"),
            )
        })
    }
}

fn pick_better<'a>(
    a: (&'a str, u8, u32, ProviderType),
    b: (&'a str, u8, u32, ProviderType),
) -> (&'a str, u8, u32, ProviderType) {
    if b.1 != a.1 {
        return if b.1 > a.1 { b } else { a };
    }
    if b.2 != a.2 {
        return if b.2 > a.2 { b } else { a };
    }
    if b.0 < a.0 { b } else { a }
}
