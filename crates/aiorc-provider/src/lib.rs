//! aiorc-provider
#![deny(unsafe_code)]
#![warn(missing_docs)]
//!
//! The Provider Backend contract (spec §3/§4.1, component C2): a vendor
//! owns a set of [`CapabilityDescriptor`]s and exposes a single
//! side-effectful `generate` operation returning a [`NormalizedResponse`].

use aiorc_core::{CapabilityDescriptor, Confidence, Message, NormalizedResponse, ProviderType, ThinkingMode};
use aiorc_core::thread::ImageReference;
use aiorc_error::{DispatchError, ErrorKind};
use async_trait::async_trait;

/// The fully composed, provider-bound request passed to
/// [`Provider::generate`].
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Ordered prompt messages (history followed by the current user turn).
    pub messages: Vec<Message>,
    /// Canonical model name to invoke. Already resolved by the registry —
    /// a provider never sees an alias.
    pub model: String,
    /// Sampling temperature, if supplied.
    pub temperature: Option<f64>,
    /// System prompt, supplied externally per tool.
    pub system_prompt: Option<String>,
    /// Opaque tool/function-calling schema, if the caller wants the model
    /// to consider tool use.
    pub tools: Option<serde_json::Value>,
    /// Images to attach to the call.
    pub images: Vec<ImageReference>,
    /// Requested thinking depth.
    pub thinking_mode: Option<ThinkingMode>,
    /// Whether the caller wants a streamed response. A provider that
    /// cannot stream may ignore this and return a single complete
    /// response; streaming is a transport concern out of this contract's
    /// scope (spec §1 out-of-scope).
    pub stream: bool,
    /// Self-reported workflow confidence, passed through for providers
    /// that adjust their own sampling based on investigation maturity.
    /// `None` for simple (non-workflow) tool calls.
    pub confidence: Option<Confidence>,
}

/// A vendor backend: an immutable capability set plus the sole
/// side-effectful `generate` operation.
#[async_trait]
pub trait Provider: Send + Sync {
    /// The vendor tag for every descriptor this provider owns.
    fn provider_type(&self) -> ProviderType;

    /// Every model this provider can serve.
    fn descriptors(&self) -> &[CapabilityDescriptor];

    /// Look up one descriptor by canonical model name.
    fn descriptor(&self, model_name: &str) -> Option<&CapabilityDescriptor> {
        self.descriptors().iter().find(|d| d.model_name == model_name)
    }

    /// Run one generation call.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::UnknownModel`] if `request.model` is not in
    /// this provider's descriptor set, [`ErrorKind::FeatureUnsupported`] if
    /// the request uses a feature the resolved descriptor disallows, and
    /// [`ErrorKind::UpstreamError`] for transport/HTTP failures (with
    /// `retryable` set per spec §4.1: true for 429/5xx/timeouts, false for
    /// other 4xx).
    async fn generate(&self, request: GenerateRequest) -> Result<NormalizedResponse, DispatchError>;
}

/// Validate a [`GenerateRequest`] against the descriptor it claims to
/// target, before a concrete provider spends a network round-trip on it.
/// Intended to be called as the first line of every `Provider::generate`
/// implementation.
///
/// # Errors
///
/// See [`Provider::generate`].
pub fn validate_request(
    descriptor: &CapabilityDescriptor,
    request: &GenerateRequest,
) -> Result<(), DispatchError> {
    if descriptor.model_name != request.model {
        return Err(DispatchError::new(
            ErrorKind::UnknownModel,
            format!(
                "model '{}' is not served by descriptor '{}'",
                request.model, descriptor.model_name
            ),
        ));
    }
    if !request.images.is_empty() && !descriptor.features.supports_images {
        return Err(DispatchError::new(
            ErrorKind::FeatureUnsupported,
            format!("model '{}' does not support images", descriptor.model_name),
        ));
    }
    if request.temperature.is_some() && !descriptor.features.supports_temperature {
        return Err(DispatchError::new(
            ErrorKind::FeatureUnsupported,
            format!(
                "model '{}' does not support a temperature parameter",
                descriptor.model_name
            ),
        ));
    }
    if request.system_prompt.is_some() && !descriptor.features.supports_system_prompts {
        return Err(DispatchError::new(
            ErrorKind::FeatureUnsupported,
            format!(
                "model '{}' does not support system prompts",
                descriptor.model_name
            ),
        ));
    }
    if request.stream && !descriptor.features.supports_streaming {
        return Err(DispatchError::new(
            ErrorKind::FeatureUnsupported,
            format!("model '{}' does not support streaming", descriptor.model_name),
        ));
    }
    Ok(())
}

/// Classify an upstream HTTP status code as retryable or not, per spec
/// §4.1: `429`/`5xx`/network timeouts are retryable, other `4xx` are not.
#[must_use]
pub fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}
