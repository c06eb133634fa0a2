//! Tool Base — Simple (C7): the single-shot tool execution contract, spec
//! §4.5.

use crate::response::{TokenUsage, ToolResponse};
use aiorc_core::{Category, Message, Role, Turn};
use aiorc_envelope::BoundEnvelope;
use aiorc_error::{DispatchError, ErrorKind};
use aiorc_policy::RestrictionPolicy;
use aiorc_provider::GenerateRequest;
use aiorc_registry::ProviderRegistry;
use aiorc_store::{effective_budget, ConversationStore, HistoryBuilder};
use chrono::Utc;
use tracing::warn;

/// Safety margin subtracted from the effective history-token budget, per
/// spec §4.3.
pub const SAFETY_MARGIN_TOKENS: u32 = 512;
/// Default token budget requested for history reconstruction before the
/// per-model cap (context window minus output cap minus safety margin) is
/// applied.
pub const DEFAULT_HISTORY_TOKEN_BUDGET: u32 = 64_000;

/// A single-shot analysis tool: one prompt in, one provider call, one
/// response out. System-prompt text and tool-specific business logic
/// beyond this shared contract are out-of-core (spec §1).
pub trait SimpleTool: Send + Sync {
    /// The tool's registered name, as a dispatcher would look it up.
    fn name(&self) -> &str;

    /// The task category used for auto-mode model selection.
    fn category(&self) -> Category;

    /// The system prompt to prepend to every call this tool makes.
    /// Supplied externally per tool (spec §4.5 step 3); core only passes
    /// it through.
    fn system_prompt(&self) -> &str;
}

/// Run the single-shot algorithm of spec §4.5 against `tool`.
///
/// # Errors
///
/// Returns [`ErrorKind::UnknownModel`] / [`ErrorKind::ModelRestricted`] /
/// [`ErrorKind::NoEligibleModel`] from model resolution, or whatever
/// [`aiorc_provider::Provider::generate`] returns. Thread state is
/// mutated only after `generate` succeeds, per spec §4.5 step 5 and §8
/// property 9.
pub async fn execute_simple_tool(
    tool: &dyn SimpleTool,
    envelope: BoundEnvelope,
    registry: &ProviderRegistry,
    store: &ConversationStore,
    policy: &RestrictionPolicy,
) -> Result<ToolResponse, DispatchError> {
    // 1. Resolve model, explicit or auto, subject to restriction policy.
    let canonical_model = if envelope.model.eq_ignore_ascii_case("auto") {
        registry.select_auto(tool.category(), policy)?
    } else {
        let (provider, canonical) = registry.resolve(&envelope.model)?;
        let decision = policy.check(&canonical, &provider.provider_type());
        if !decision.allowed {
            return Err(DispatchError::new(
                ErrorKind::ModelRestricted,
                decision.reason.unwrap_or_else(|| format!("model '{canonical}' is restricted")),
            ));
        }
        canonical
    };
    let (provider, canonical_model) = registry.resolve(&canonical_model)?;
    let descriptor = provider.descriptor(&canonical_model).ok_or_else(|| {
        DispatchError::new(
            ErrorKind::InternalError,
            format!("registry resolved '{canonical_model}' but the provider has no matching descriptor"),
        )
    })?;

    // 2. Hydrate history if continuing, else begin fresh. A continuation_id
    // that no longer resolves to a live thread is downgraded to "start a
    // new thread" with a metadata warning (spec §7 ThreadNotFound row),
    // rather than surfaced as an error.
    let mut warning: Option<String> = None;
    let (existing_thread_id, history) = match envelope.continuation_id {
        Some(cid) if store.get_thread_by_uuid(cid).await.is_some() => {
            let budget = effective_budget(
                DEFAULT_HISTORY_TOKEN_BUDGET,
                descriptor.context_window_tokens,
                descriptor.max_output_tokens,
                SAFETY_MARGIN_TOKENS,
            );
            let history = HistoryBuilder::new(store).build_history(cid, budget).await;
            (Some(cid), history)
        }
        Some(cid) => {
            warning = Some(format!("continuation_id '{cid}' was not found; starting a new thread"));
            warn!(%cid, tool = tool.name(), "thread not found, starting new thread");
            (None, aiorc_store::HistoryResult::default())
        }
        None => (None, aiorc_store::HistoryResult::default()),
    };

    // 3. Compose provider-bound messages: history then the current turn.
    let mut messages: Vec<Message> = history.messages;
    messages.push(Message::user(envelope.prompt.clone()));

    // 4. Invoke the provider. No store mutation happens before this
    // succeeds.
    let request = GenerateRequest {
        messages,
        model: canonical_model.clone(),
        temperature: envelope.temperature,
        system_prompt: Some(tool.system_prompt().to_string()),
        tools: None,
        images: vec![],
        thinking_mode: envelope.thinking_mode,
        stream: false,
        confidence: None,
    };
    let response = provider.generate(request).await?;

    // 5. Create or continue the thread, then append user then assistant
    // turns — only reachable once `generate` has already succeeded.
    let thread_id = match existing_thread_id {
        Some(id) => id,
        None => {
            store
                .create_thread(
                    tool.name(),
                    serde_json::json!({
                        "prompt": envelope.prompt,
                        "model": envelope.model,
                    }),
                )
                .await
        }
    };

    let user_turn = Turn {
        role: Role::User,
        content: envelope.prompt.clone(),
        tool_name: tool.name().into(),
        model_name: None,
        files_referenced: envelope.absolute_file_paths.clone(),
        embedded_files: vec![],
        images_referenced: vec![],
        created_at: Utc::now(),
    };
    store.append_turn(thread_id, user_turn).await?;

    let assistant_turn = Turn {
        role: Role::Assistant,
        content: response.content.clone(),
        tool_name: tool.name().into(),
        model_name: Some(response.model_name.clone()),
        files_referenced: vec![],
        embedded_files: vec![],
        images_referenced: vec![],
        created_at: Utc::now(),
    };
    store.append_turn(thread_id, assistant_turn).await?;

    // 6. Shape the response.
    let mut metadata = serde_json::json!({
        "model_used": canonical_model,
        "provider": provider.provider_type().to_string(),
    });
    if let Some(w) = warning {
        metadata["warning"] = serde_json::Value::String(w);
    }

    Ok(ToolResponse {
        content: response.content,
        continuation_id: thread_id,
        model_used: canonical_model,
        tokens: TokenUsage {
            input: response.input_tokens,
            output: response.output_tokens,
        },
        metadata,
    })
}
