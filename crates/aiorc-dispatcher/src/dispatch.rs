//! The Dispatcher (C9, spec §4.7): tool lookup, envelope binding, timeout
//! enforcement, error catching, and response shaping. This module is
//! transport-agnostic; [`crate::http`] wires it to Axum.

use crate::catalog::{ToolCatalog, ToolEntry};
use crate::timeouts::TimeoutTable;
use aiorc_core::{CapabilityDescriptor, FeatureFlags, RequestEnvelope};
use aiorc_error::{DispatchError, ErrorKind};
use aiorc_policy::RestrictionPolicy;
use aiorc_registry::ProviderRegistry;
use aiorc_store::ConversationStore;
use aiorc_tools::{execute_simple_tool, execute_workflow_step, FileReader, ToolResponse};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info_span, warn, Instrument};
use uuid::Uuid;

/// The `{kind, message, details?}` shape of spec §6's error member.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// Stable wire code, see [`aiorc_error::ErrorKind::code`].
    pub kind: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Structured detail payload, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&DispatchError> for ErrorBody {
    fn from(e: &DispatchError) -> Self {
        Self { kind: e.kind.code(), message: e.message.clone(), details: e.details.clone() }
    }
}

/// The shared response shape of spec §6: `{success, content?,
/// continuation_id?, error?, metadata}`.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchResponse {
    /// Whether the tool invocation succeeded.
    pub success: bool,
    /// Generated content, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// The thread ID, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation_id: Option<Uuid>,
    /// The structured error, present on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    /// Tool-specific metadata, always present (possibly empty object).
    pub metadata: serde_json::Value,
}

fn error_response(err: DispatchError) -> DispatchResponse {
    DispatchResponse {
        success: false,
        content: None,
        continuation_id: None,
        error: Some(ErrorBody::from(&err)),
        metadata: serde_json::json!({}),
    }
}

fn success_response(resp: ToolResponse) -> DispatchResponse {
    let mut metadata = resp.metadata;
    metadata["model_used"] = serde_json::Value::String(resp.model_used);
    metadata["tokens"] = serde_json::json!({ "input": resp.tokens.input, "output": resp.tokens.output });
    DispatchResponse {
        success: true,
        content: Some(resp.content),
        continuation_id: Some(resp.continuation_id),
        error: None,
        metadata,
    }
}

/// One model's entry in the `GET /v1/models` catalog, per SPEC_FULL.md
/// §C.1's pinned shape.
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    /// Owning provider's display string, e.g. `"openai"`.
    pub provider_type: String,
    /// Canonical model name.
    pub canonical_name: String,
    /// Case-insensitive aliases.
    pub aliases: Vec<String>,
    /// Context window, in tokens.
    pub context_window_tokens: u32,
    /// Max output tokens.
    pub max_output_tokens: u32,
    /// The descriptor's feature flags.
    pub features: FeatureFlags,
}

impl From<&CapabilityDescriptor> for ModelSummary {
    fn from(d: &CapabilityDescriptor) -> Self {
        Self {
            provider_type: d.provider_type.to_string(),
            canonical_name: d.model_name.clone(),
            aliases: d.aliases.iter().cloned().collect(),
            context_window_tokens: d.context_window_tokens,
            max_output_tokens: d.max_output_tokens,
            features: d.features,
        }
    }
}

/// Everything the Dispatcher needs to route and execute a tool call,
/// constructed once at startup and shared across concurrent requests.
pub struct Dispatcher {
    catalog: ToolCatalog,
    registry: Arc<ProviderRegistry>,
    store: ConversationStore,
    policy: RestrictionPolicy,
    files: Arc<dyn FileReader>,
    timeouts: TimeoutTable,
}

impl Dispatcher {
    /// Construct a dispatcher from its dependencies.
    #[must_use]
    pub fn new(
        catalog: ToolCatalog,
        registry: Arc<ProviderRegistry>,
        store: ConversationStore,
        policy: RestrictionPolicy,
        files: Arc<dyn FileReader>,
        timeouts: TimeoutTable,
    ) -> Self {
        Self { catalog, registry, store, policy, files, timeouts }
    }

    /// Tool names this dispatcher can route to.
    #[must_use]
    pub fn tool_names(&self) -> Vec<&str> {
        self.catalog.names()
    }

    /// A snapshot of every model this dispatcher's registry can serve, for
    /// the model-catalog surface (spec §6, SPEC_FULL.md §C.1).
    #[must_use]
    pub fn list_models(&self) -> Vec<ModelSummary> {
        self.registry.list_descriptors().iter().map(ModelSummary::from).collect()
    }

    /// Run spec §4.7's dispatch algorithm for one call: lookup, bind,
    /// timeout-bounded execution, and response shaping. Never returns
    /// `Err` — every failure mode is encoded in the returned
    /// [`DispatchResponse`], matching the "catch errors, serialize" step
    /// of the spec.
    pub async fn dispatch(&self, tool_name: &str, arguments: serde_json::Value, correlation_id: Uuid) -> DispatchResponse {
        let span = info_span!("dispatch", %correlation_id, tool = tool_name);
        self.dispatch_inner(tool_name, arguments, correlation_id).instrument(span).await
    }

    async fn dispatch_inner(&self, tool_name: &str, arguments: serde_json::Value, correlation_id: Uuid) -> DispatchResponse {
        let Some(entry) = self.catalog.get(tool_name).cloned() else {
            return error_response(DispatchError::new(ErrorKind::UnknownTool, format!("no tool named '{tool_name}'")));
        };

        let envelope: RequestEnvelope = match serde_json::from_value(arguments) {
            Ok(e) => e,
            Err(e) => {
                return error_response(DispatchError::new(
                    ErrorKind::ValidationError,
                    format!("malformed arguments for tool '{tool_name}': {e}"),
                ))
            }
        };

        let timeout = self.timeouts.for_category(entry.timeout_category());
        match tokio::time::timeout(timeout, self.execute(&entry, envelope)).await {
            Ok(Ok(resp)) => success_response(resp),
            Ok(Err(err)) => {
                if err.kind == ErrorKind::InternalError {
                    error!(%correlation_id, error = %err, "internal error dispatching tool call");
                } else {
                    warn!(%correlation_id, error = %err, "tool call failed");
                }
                let err = if err.kind == ErrorKind::InternalError && err.details.is_none() {
                    DispatchError::internal(err.message, correlation_id)
                } else {
                    err
                };
                error_response(err)
            }
            Err(_) => {
                warn!(%correlation_id, tool = tool_name, timeout_secs = timeout.as_secs(), "tool call timed out");
                error_response(DispatchError::upstream(
                    format!("tool '{tool_name}' exceeded its {}s timeout", timeout.as_secs()),
                    true,
                ))
            }
        }
    }

    async fn execute(&self, entry: &ToolEntry, envelope: RequestEnvelope) -> Result<ToolResponse, DispatchError> {
        match entry {
            ToolEntry::Simple(tool) => {
                let bound = aiorc_envelope::bind_simple(envelope)?;
                execute_simple_tool(tool.as_ref(), bound, &self.registry, &self.store, &self.policy).await
            }
            ToolEntry::Workflow(tool) => {
                let bound = aiorc_envelope::bind_workflow(envelope)?;
                let outcome =
                    execute_workflow_step(tool.as_ref(), bound, &self.registry, &self.store, &self.policy, self.files.as_ref()).await?;
                Ok(outcome.response)
            }
        }
    }

    /// Sweep expired threads from the conversation store (spec §4.3,
    /// §C.5: driven both opportunistically and by a periodic background
    /// task).
    pub async fn sweep_expired(&self, now: chrono::DateTime<chrono::Utc>) {
        self.store.sweep_expired(now).await;
    }
}
