//! aiorc-core
#![deny(unsafe_code)]
#![warn(missing_docs)]
//!
//! The shared data model for the orchestration server: capability
//! descriptors, normalized provider responses, conversation threads and
//! turns, task categories, and the raw (unvalidated) request envelope
//! shapes. If you only take one dependency from this workspace, take this
//! one.

/// Task categories driving auto-mode model selection.
pub mod category;
/// Capability Descriptor and provider-type tagging (C1).
pub mod capability;
/// Raw Request Envelope shapes (C6 data model).
pub mod envelope;
/// Shared user/assistant message shape.
pub mod message;
/// Normalized provider response shape.
pub mod response;
/// Conversation Thread and Turn (C4 data model).
pub mod thread;

pub use capability::{
    CapabilityDescriptor, CapabilityDescriptorBuilder, DescriptorError, FeatureFlags, ProviderType,
};
pub use category::Category;
pub use envelope::{Confidence, RequestEnvelope, ThinkingMode, WorkflowFields};
pub use message::Message;
pub use response::{FinishReason, NormalizedResponse};
pub use thread::{EmbeddedFile, ImageReference, Role, Thread, Turn, MAX_TURNS, THREAD_TTL};
