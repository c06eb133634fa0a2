//! aiorc-provider-mock
#![deny(unsafe_code)]
#![warn(missing_docs)]
//!
//! A deterministic, in-memory [`Provider`] implementation used by
//! integration tests and local development. It performs no network I/O:
//! `generate` either evaluates a trivial arithmetic expression in the
//! final user message (to exercise "does the answer look right" style
//! assertions) or echoes back every user message it was given, which is
//! enough to exercise cross-turn memory without a real model behind it.

use aiorc_core::{
    CapabilityDescriptorBuilder, FeatureFlags, FinishReason, NormalizedResponse, ProviderType,
};
use aiorc_error::{DispatchError, ErrorKind};
use aiorc_provider::{GenerateRequest, Provider, validate_request};
use async_trait::async_trait;

/// The mock provider's registered models.
pub const MOCK_FLASH: &str = "mock-flash";
/// A vision-and-reasoning-capable mock model.
pub const MOCK_PRO: &str = "mock-pro";
/// The mock provider's highest-intelligence model, used in tests that
/// exercise expert validation.
pub const MOCK_EXPERT: &str = "mock-expert";

/// In-memory provider backend with three fixed, deterministic models.
#[derive(Debug, Clone)]
pub struct MockProvider {
    descriptors: Vec<aiorc_core::CapabilityDescriptor>,
}

impl Default for MockProvider {
    fn default() -> Self {
        let flash = CapabilityDescriptorBuilder::new(MOCK_FLASH, ProviderType::Custom { name: "mock".into() })
            .friendly_name("Mock Flash")
            .alias("fast")
            .context_window_tokens(32_000)
            .max_output_tokens(4_000)
            .intelligence_score(8)
            .allow_code_generation(true)
            .features(FeatureFlags {
                supports_streaming: true,
                supports_system_prompts: true,
                supports_temperature: true,
                ..FeatureFlags::default()
            })
            .build()
            .expect("built-in mock descriptor is valid");

        let pro = CapabilityDescriptorBuilder::new(MOCK_PRO, ProviderType::Custom { name: "mock".into() })
            .friendly_name("Mock Pro")
            .alias("pro")
            .context_window_tokens(1_000_000)
            .max_output_tokens(16_000)
            .intelligence_score(18)
            .max_image_bytes(5 * 1024 * 1024)
            .allow_code_generation(true)
            .features(FeatureFlags {
                supports_streaming: true,
                supports_system_prompts: true,
                supports_temperature: true,
                supports_images: true,
                supports_extended_thinking: true,
                supports_function_calling: true,
                supports_json_mode: true,
            })
            .build()
            .expect("built-in mock descriptor is valid");

        let expert = CapabilityDescriptorBuilder::new(MOCK_EXPERT, ProviderType::Custom { name: "mock".into() })
            .friendly_name("Mock Expert")
            .alias("expert")
            .context_window_tokens(500_000)
            .max_output_tokens(16_000)
            .intelligence_score(20)
            .allow_code_generation(true)
            .features(FeatureFlags {
                supports_streaming: true,
                supports_system_prompts: true,
                supports_temperature: true,
                supports_extended_thinking: true,
                ..FeatureFlags::default()
            })
            .build()
            .expect("built-in mock descriptor is valid");

        Self {
            descriptors: vec![flash, pro, expert],
        }
    }
}

impl MockProvider {
    /// Construct a provider with the standard three-model catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Custom { name: "mock".into() }
    }

    fn descriptors(&self) -> &[aiorc_core::CapabilityDescriptor] {
        &self.descriptors
    }

    async fn generate(&self, request: GenerateRequest) -> Result<NormalizedResponse, DispatchError> {
        let descriptor = self.descriptor(&request.model).ok_or_else(|| {
            DispatchError::new(
                ErrorKind::UnknownModel,
                format!("mock provider has no model '{}'", request.model),
            )
        })?;
        validate_request(descriptor, &request)?;

        let user_messages: Vec<&str> = request
            .messages
            .iter()
            .filter(|m| m.role == "user")
            .map(|m| m.content.as_str())
            .collect();

        let last = user_messages.last().copied().unwrap_or_default();
        let content = if let Some(sum) = arithmetic_answer(last) {
            format!("{sum}")
        } else {
            format!("mock reply recalling: {}", user_messages.join(" | "))
        };

        let input_tokens = estimate_tokens(&request.messages.iter().map(|m| m.content.as_str()).collect::<Vec<_>>().join(" "));
        let output_tokens = estimate_tokens(&content);

        Ok(NormalizedResponse {
            content,
            finish_reason: FinishReason::Stop,
            input_tokens,
            output_tokens,
            model_name: descriptor.model_name.clone(),
            provider_type: self.provider_type(),
            raw: None,
        })
    }
}

/// Recognize a trivial `"A+B=?"`-shaped prompt and return its sum, or
/// `None` if the text isn't of that shape.
fn arithmetic_answer(text: &str) -> Option<i64> {
    let trimmed = text.trim().trim_end_matches('?').trim_end_matches('=').trim();
    let (a, b) = trimmed.split_once('+')?;
    let a: i64 = a.trim().parse().ok()?;
    let b: i64 = b.trim().parse().ok()?;
    Some(a + b)
}

/// Coarse 4-chars-per-token estimator, per spec §9 "Token estimation".
#[must_use]
pub fn estimate_tokens(text: &str) -> u32 {
    (text.len() as u32).div_ceil(4).max(1)
}
