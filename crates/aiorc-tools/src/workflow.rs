//! Tool Base — Workflow (C8): the plan/explore/validate step machine,
//! spec §4.6.
//!
//! Intermediate steps (`PLANNING`, `INVESTIGATING`) never call a
//! provider — the investigating client supplies its own narrative and
//! findings each step; this crate only tracks state, applies the
//! file-embedding policy, and appends turns. Only the terminal step may
//! place an optional "expert validation" call, per spec §2: "workflow
//! tools advance the state machine ... optionally making a final expert
//! call."

use crate::files::{FileMetadata, FileReader};
use crate::response::{TokenUsage, ToolResponse};
use aiorc_core::{Category, Confidence, EmbeddedFile, Message, Role, Thread, Turn};
use aiorc_envelope::{BoundEnvelope, BoundWorkflowFields};
use aiorc_error::{DispatchError, ErrorKind};
use aiorc_policy::RestrictionPolicy;
use aiorc_provider::GenerateRequest;
use aiorc_registry::ProviderRegistry;
use aiorc_store::ConversationStore;
use chrono::Utc;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Token budget applied to per-step file embedding, separate from the
/// History Builder's own budget (spec §4.3) since a workflow step embeds
/// against the running investigation, not a reconstructed provider
/// history.
pub const FILE_EMBED_TOKEN_BUDGET: u32 = 48_000;

/// Coarse 4-chars-per-token estimator, matching the store's own (spec §9).
fn estimate_tokens(text: &str) -> u32 {
    (text.len() as u32).div_ceil(4).max(1)
}

/// Which phase of the investigation a step belongs to, per spec §4.6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Step 1, with more steps to come: announce intent, embed
    /// references only.
    Planning,
    /// A non-terminal step after the first: embed new file bodies.
    Investigating,
    /// The terminal step, with confidence short of `certain`: embed
    /// everything relevant and optionally consult an expert model.
    Validating,
    /// The terminal step, with confidence `certain`: the client asserts
    /// completeness, skip expert validation entirely.
    Terminal,
}

/// Determine a step's [`Phase`] from its declared fields, per the
/// transition table in spec §4.6.
#[must_use]
pub fn compute_phase(step_number: u32, next_step_required: bool, confidence: Confidence) -> Phase {
    if !next_step_required {
        if confidence == Confidence::Certain {
            Phase::Terminal
        } else {
            Phase::Validating
        }
    } else if step_number == 1 {
        Phase::Planning
    } else {
        Phase::Investigating
    }
}

/// A single embedded file as attached to a step's turn.
#[derive(Debug, Clone)]
pub struct StepFileEmbedding {
    /// Absolute path.
    pub path: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Best-effort language hint.
    pub language_hint: Option<String>,
    /// Full body, if this phase embeds bodies (absent for PLANNING's
    /// reference-only policy).
    pub content: Option<String>,
}

/// Outcome of an optional expert-validation call.
#[derive(Debug, Clone)]
pub struct ExpertOutcome {
    /// Whether the expert model was actually invoked this step.
    pub invoked: bool,
    /// The expert's response text, if the call succeeded.
    pub content: Option<String>,
    /// A human-readable description of the failure, if the call was
    /// attempted but failed. The step still succeeds in this case (spec
    /// §4.6: "degrade gracefully").
    pub error: Option<String>,
    /// Canonical name of the model consulted, if any.
    pub model_used: Option<String>,
}

impl ExpertOutcome {
    fn skipped() -> Self {
        Self { invoked: false, content: None, error: None, model_used: None }
    }
}

/// A workflow-style analysis tool. Tool-specific prompt text beyond the
/// expert system prompt is out-of-core (spec §1).
pub trait WorkflowTool: Send + Sync {
    /// The tool's registered name.
    fn name(&self) -> &str;

    /// Whether this tool consults an expert model at all when it reaches
    /// `VALIDATING`. Tools that only want local synthesis may return
    /// `false`.
    fn wants_expert_validation(&self) -> bool {
        true
    }

    /// The task category used to select an expert-validation model,
    /// chosen independently from the tool's own (absent) primary model
    /// per spec §9 open question 1 — this implementation makes the
    /// choice per-tool rather than globally fixed per category.
    fn expert_category(&self) -> Category {
        Category::Reasoning
    }

    /// System prompt for the expert-validation call.
    fn expert_system_prompt(&self) -> &str;
}

/// Outcome of one workflow step, returned by [`execute_workflow_step`].
#[derive(Debug, Clone)]
pub struct WorkflowStepOutcome {
    /// The thread this investigation lives in.
    pub continuation_id: uuid::Uuid,
    /// This step's resolved phase.
    pub phase: Phase,
    /// The caller's self-reported confidence for this step.
    pub confidence: Confidence,
    /// Files embedded (by reference or body, per phase) this step.
    pub embedded_files: Vec<StepFileEmbedding>,
    /// The expert-validation outcome, present only at `Validating`.
    pub expert: Option<ExpertOutcome>,
    /// Response shape matching every other tool's output contract.
    pub response: ToolResponse,
}

/// Run one step of the workflow algorithm in spec §4.6.
///
/// # Errors
///
/// Returns [`ErrorKind::ThreadCapacityExceeded`] if the thread is already
/// full, or an upstream error from the optional expert call surfaces only
/// when it is NOT an expert call (i.e. never — expert failures always
/// degrade per spec §4.6; this signature returns `Err` only for
/// structural failures such as a full thread).
pub async fn execute_workflow_step(
    tool: &dyn WorkflowTool,
    envelope: BoundEnvelope,
    registry: &ProviderRegistry,
    store: &ConversationStore,
    policy: &RestrictionPolicy,
    files: &dyn FileReader,
) -> Result<WorkflowStepOutcome, DispatchError> {
    let workflow = envelope
        .workflow
        .clone()
        .expect("aiorc-envelope guarantees workflow fields are present on a bound workflow envelope");

    let phase = compute_phase(workflow.step_number, workflow.next_step_required, workflow.confidence);
    debug!(tool = tool.name(), step = workflow.step_number, ?phase, "workflow step");

    let mut warning: Option<String> = None;
    let (thread_id, prior_thread) = match envelope.continuation_id {
        Some(cid) => match store.get_thread_by_uuid(cid).await {
            Some(thread) => (cid, Some(thread)),
            None => {
                warning = Some(format!("continuation_id '{cid}' was not found; starting a new thread"));
                warn!(%cid, tool = tool.name(), "thread not found, starting new thread");
                let new_id = store
                    .create_thread(tool.name(), serde_json::json!({ "step": workflow.step }))
                    .await;
                (new_id, None)
            }
        },
        None => {
            let new_id = store
                .create_thread(tool.name(), serde_json::json!({ "step": workflow.step }))
                .await;
            (new_id, None)
        }
    };

    let embedded_files = embed_files_for_phase(phase, &workflow, prior_thread.as_ref(), files)?;

    let step_turn = Turn {
        role: Role::User,
        content: format!("{}\n\nFindings: {}", workflow.step, workflow.findings),
        tool_name: tool.name().into(),
        model_name: None,
        files_referenced: embedded_files.iter().map(|f| f.path.clone()).collect(),
        embedded_files: embedded_files
            .iter()
            .filter_map(|f| f.content.as_ref().map(|c| EmbeddedFile::new(f.path.clone(), c.clone())))
            .collect(),
        images_referenced: vec![],
        created_at: Utc::now(),
    };
    store.append_turn(thread_id, step_turn).await?;

    let (expert, synthesis) = match phase {
        Phase::Planning | Phase::Investigating => (None, None),
        Phase::Terminal => {
            let synthesis = local_synthesis(&workflow, &[]);
            append_synthesis_turn(store, thread_id, tool.name(), &synthesis).await?;
            (Some(ExpertOutcome::skipped()), Some(synthesis))
        }
        Phase::Validating => {
            let outcome = if tool.wants_expert_validation() {
                run_expert_validation(tool, &workflow, thread_id, store, registry, policy).await
            } else {
                ExpertOutcome::skipped()
            };
            let synthesis = local_synthesis(&workflow, &embedded_files);
            append_synthesis_turn(store, thread_id, tool.name(), &synthesis).await?;
            if let Some(content) = &outcome.content {
                append_expert_turn(store, thread_id, tool.name(), &outcome, content).await?;
            }
            (Some(outcome), Some(synthesis))
        }
    };

    let content = synthesis.unwrap_or_else(|| workflow.step.clone());
    let mut metadata = serde_json::json!({
        "step_number": workflow.step_number,
        "total_steps": workflow.total_steps,
        "confidence": confidence_str(workflow.confidence),
        "phase": phase_str(phase),
    });
    if let Some(w) = warning {
        metadata["warning"] = serde_json::Value::String(w);
    }
    if let Some(expert) = &expert {
        metadata["expert_invoked"] = serde_json::Value::Bool(expert.invoked);
        if let Some(err) = &expert.error {
            metadata["expert_error"] = serde_json::Value::String(err.clone());
        }
        if let Some(model) = &expert.model_used {
            metadata["expert_model_used"] = serde_json::Value::String(model.clone());
        }
    }

    let response = ToolResponse {
        content,
        continuation_id: thread_id,
        model_used: expert
            .as_ref()
            .and_then(|e| e.model_used.clone())
            .unwrap_or_else(|| "none".to_string()),
        tokens: TokenUsage::default(),
        metadata,
    };

    Ok(WorkflowStepOutcome {
        continuation_id: thread_id,
        phase,
        confidence: workflow.confidence,
        embedded_files,
        expert,
        response,
    })
}

fn confidence_str(c: Confidence) -> &'static str {
    match c {
        Confidence::Exploring => "exploring",
        Confidence::Low => "low",
        Confidence::Medium => "medium",
        Confidence::High => "high",
        Confidence::VeryHigh => "very_high",
        Confidence::AlmostCertain => "almost_certain",
        Confidence::Certain => "certain",
    }
}

fn phase_str(phase: Phase) -> &'static str {
    match phase {
        Phase::Planning => "planning",
        Phase::Investigating => "investigating",
        Phase::Validating => "validating",
        Phase::Terminal => "terminal",
    }
}

fn already_embedded_paths(thread: Option<&Thread>) -> HashSet<String> {
    let Some(thread) = thread else {
        return HashSet::new();
    };
    thread
        .turns
        .iter()
        .flat_map(|t| t.embedded_files.iter())
        .map(|f| f.path.clone())
        .collect()
}

fn embed_files_for_phase(
    phase: Phase,
    workflow: &BoundWorkflowFields,
    prior_thread: Option<&Thread>,
    files: &dyn FileReader,
) -> Result<Vec<StepFileEmbedding>, DispatchError> {
    match phase {
        Phase::Planning => {
            let mut paths: Vec<&String> = workflow.relevant_files.iter().chain(workflow.files_checked.iter()).collect();
            paths.dedup();
            let mut seen = HashSet::new();
            let mut out = Vec::new();
            for path in paths {
                if !seen.insert(path.clone()) {
                    continue;
                }
                let FileMetadata { size_bytes, language_hint } = files.metadata(path)?;
                out.push(StepFileEmbedding {
                    path: path.clone(),
                    size_bytes,
                    language_hint,
                    content: None,
                });
            }
            Ok(out)
        }
        Phase::Investigating => {
            let already = already_embedded_paths(prior_thread);
            let candidates: Vec<&String> = workflow
                .relevant_files
                .iter()
                .filter(|p| !already.contains(*p))
                .collect();
            embed_bodies_within_budget(candidates, files)
        }
        Phase::Validating | Phase::Terminal => {
            let candidates: Vec<&String> = workflow.relevant_files.iter().collect();
            embed_bodies_within_budget(candidates, files)
        }
    }
}

fn embed_bodies_within_budget(
    candidates: Vec<&String>,
    files: &dyn FileReader,
) -> Result<Vec<StepFileEmbedding>, DispatchError> {
    let mut remaining = FILE_EMBED_TOKEN_BUDGET;
    let mut out = Vec::new();
    // Newest-declared-first so that, when the budget runs out, the files
    // named earliest in this step's list are the ones evicted, mirroring
    // the History Builder's "oldest evicted first" discipline.
    for path in candidates.into_iter().rev() {
        let content = files.read(path)?;
        let cost = estimate_tokens(&content);
        if cost > remaining {
            continue;
        }
        remaining -= cost;
        let language_hint = crate::files::language_hint_for(path);
        out.push(StepFileEmbedding {
            path: path.clone(),
            size_bytes: content.len() as u64,
            language_hint,
            content: Some(content),
        });
    }
    out.reverse();
    Ok(out)
}

fn local_synthesis(workflow: &BoundWorkflowFields, embedded: &[StepFileEmbedding]) -> String {
    format!(
        "Investigation synthesis ({} file(s) reviewed): {}",
        embedded.len(),
        workflow.findings
    )
}

async fn append_synthesis_turn(
    store: &ConversationStore,
    thread_id: uuid::Uuid,
    tool_name: &str,
    synthesis: &str,
) -> Result<(), DispatchError> {
    store
        .append_turn(
            thread_id,
            Turn {
                role: Role::Assistant,
                content: synthesis.to_string(),
                tool_name: tool_name.into(),
                model_name: None,
                files_referenced: vec![],
                embedded_files: vec![],
                images_referenced: vec![],
                created_at: Utc::now(),
            },
        )
        .await
}

async fn append_expert_turn(
    store: &ConversationStore,
    thread_id: uuid::Uuid,
    tool_name: &str,
    outcome: &ExpertOutcome,
    content: &str,
) -> Result<(), DispatchError> {
    store
        .append_turn(
            thread_id,
            Turn {
                role: Role::Assistant,
                content: content.to_string(),
                tool_name: tool_name.into(),
                model_name: outcome.model_used.clone(),
                files_referenced: vec![],
                embedded_files: vec![],
                images_referenced: vec![],
                created_at: Utc::now(),
            },
        )
        .await
}

async fn run_expert_validation(
    tool: &dyn WorkflowTool,
    workflow: &BoundWorkflowFields,
    thread_id: uuid::Uuid,
    store: &ConversationStore,
    registry: &ProviderRegistry,
    policy: &RestrictionPolicy,
) -> ExpertOutcome {
    let model = match registry.select_auto(tool.expert_category(), policy) {
        Ok(m) => m,
        Err(e) => {
            warn!(tool = tool.name(), error = %e, "expert validation model selection failed");
            return ExpertOutcome {
                invoked: true,
                content: None,
                error: Some(e.to_string()),
                model_used: None,
            };
        }
    };
    let (provider, model) = match registry.resolve(&model) {
        Ok(p) => p,
        Err(e) => {
            return ExpertOutcome {
                invoked: true,
                content: None,
                error: Some(e.to_string()),
                model_used: None,
            }
        }
    };

    let trace = store
        .get_thread_by_uuid(thread_id)
        .await
        .map(|thread| {
            thread
                .turns
                .iter()
                .map(|t| Message { role: format!("{:?}", t.role).to_lowercase(), content: t.content.clone() })
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let mut messages = trace;
    messages.push(Message::user(format!(
        "Review this investigation and its findings. Approve, challenge, or extend them.\n\nFindings: {}",
        workflow.findings
    )));

    let request = GenerateRequest {
        messages,
        model: model.clone(),
        temperature: None,
        system_prompt: Some(tool.expert_system_prompt().to_string()),
        tools: None,
        images: vec![],
        thinking_mode: None,
        stream: false,
        confidence: Some(workflow.confidence),
    };

    match provider.generate(request).await {
        Ok(resp) => ExpertOutcome {
            invoked: true,
            content: Some(resp.content),
            error: None,
            model_used: Some(model),
        },
        Err(e) => {
            warn!(tool = tool.name(), error = %e, "expert validation call failed; degrading to local synthesis");
            ExpertOutcome {
                invoked: true,
                content: None,
                error: Some(e.to_string()),
                model_used: Some(model),
            }
        }
    }
}
