//! aiorc-tools
#![deny(unsafe_code)]
#![warn(missing_docs)]
//!
//! Tool Base contracts (spec §4.5, §4.6, components C7/C8). Simple and
//! Workflow tools are modeled as tagged forms — a capability set each, not
//! inheritance branches — per spec §9's dynamic-dispatch design note.

/// File access boundary interface used by workflow file-embedding.
pub mod files;
/// The response shape shared by every Tool Base.
pub mod response;
/// Tool Base — Simple (C7): single-shot execution.
pub mod simple;
/// Tool Base — Workflow (C8): the plan/explore/validate step machine.
pub mod workflow;

pub use files::{FileMetadata, FileReader, InMemoryFileReader};
pub use response::{TokenUsage, ToolResponse};
pub use simple::{execute_simple_tool, SimpleTool, DEFAULT_HISTORY_TOKEN_BUDGET, SAFETY_MARGIN_TOKENS};
pub use workflow::{
    compute_phase, execute_workflow_step, ExpertOutcome, Phase, StepFileEmbedding, WorkflowStepOutcome,
    WorkflowTool, FILE_EMBED_TOKEN_BUDGET,
};
