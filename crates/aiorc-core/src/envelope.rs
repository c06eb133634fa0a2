//! Raw, as-deserialized Request Envelope shapes (C6 data model).
//!
//! These types carry no validation guarantees of their own; binding and
//! invariant enforcement live in the `aiorc-envelope` crate, which wraps a
//! [`RequestEnvelope`] into a `BoundEnvelope` only after every field
//! contract in spec §4.4 passes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Requested "thinking" depth for models that support it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ThinkingMode {
    /// No extended reasoning.
    Minimal,
    /// Low with a modest cost.
    Low,
    /// Balanced depth and cost.
    Medium,
    /// Favor depth over cost.
    High,
    /// Maximum available depth.
    Max,
}

/// Self-reported confidence in a workflow's findings so far. Ordered so the
/// engine can compare positions in the progression
/// `exploring → ... → certain`; regressions are a valid transition and are
/// not treated as an error (spec §4.6).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// Still forming a hypothesis.
    Exploring,
    /// Weak support for the current hypothesis.
    Low,
    /// Moderate support.
    Medium,
    /// Strong support.
    High,
    /// Very strong support.
    VeryHigh,
    /// Almost certain, but not asserting completeness.
    AlmostCertain,
    /// The client asserts the investigation is complete.
    Certain,
}

/// Base fields shared by every tool invocation. See spec §3 "Request
/// Envelope (C6) base".
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RequestEnvelope {
    /// The user-supplied prompt text.
    pub prompt: String,
    /// Model name, alias, or the literal string `"auto"`.
    pub model: String,
    /// Absolute paths to files the tool may read.
    #[serde(default)]
    pub absolute_file_paths: Vec<String>,
    /// Image references (paths or inline blobs), as raw JSON — shape
    /// mirrors [`crate::thread::ImageReference`] but is kept loosely typed
    /// here since binding may reject malformed entries field-by-field.
    #[serde(default)]
    pub images: Vec<serde_json::Value>,
    /// Existing thread to continue, if any.
    #[serde(default)]
    pub continuation_id: Option<Uuid>,
    /// Absolute path to the working directory for this invocation.
    pub working_directory_absolute_path: String,
    /// Sampling temperature, if the tool/model accepts one.
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Requested thinking depth, if applicable.
    #[serde(default)]
    pub thinking_mode: Option<ThinkingMode>,
    /// Workflow-only fields. Absent for simple tools.
    #[serde(flatten, default)]
    pub workflow: Option<WorkflowFields>,
}

/// Fields present only on workflow-style tool invocations. See spec §3
/// "Workflow extension".
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WorkflowFields {
    /// Narrative description of this step.
    pub step: String,
    /// 1-based index of this step.
    pub step_number: u32,
    /// Caller's current estimate of the total step count.
    pub total_steps: u32,
    /// Whether another step is expected after this one.
    pub next_step_required: bool,
    /// Accumulated findings so far, as free text.
    pub findings: String,
    /// Working hypothesis, if one has formed.
    #[serde(default)]
    pub hypothesis: Option<String>,
    /// Self-reported confidence.
    pub confidence: Confidence,
    /// Files already checked in this investigation.
    #[serde(default)]
    pub files_checked: Vec<String>,
    /// Files judged relevant to the current hypothesis.
    #[serde(default)]
    pub relevant_files: Vec<String>,
}
