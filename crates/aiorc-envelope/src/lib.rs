//! aiorc-envelope
#![deny(unsafe_code)]
#![warn(missing_docs)]
//!
//! Binds a raw [`RequestEnvelope`] into a validated [`BoundEnvelope`],
//! enforcing every field contract in spec §4.4 and, for workflow-style
//! tools, the step invariants of spec §3's workflow extension. A
//! [`RequestEnvelope`] carries no guarantees of its own — `continuation_id`
//! syntax is the one exception, enforced by its `Uuid` field type at
//! deserialization time, upstream of this crate — everything else is
//! re-checked here before a tool ever sees the request.

use aiorc_core::{Confidence, RequestEnvelope, ThinkingMode};
use aiorc_error::{DispatchError, ErrorKind};
use std::path::Path;
use uuid::Uuid;

/// Minimum accepted `temperature`, per spec §4.4.
pub const MIN_TEMPERATURE: f64 = 0.0;
/// Maximum accepted `temperature`, per spec §4.4. Individual providers may
/// further restrict this range; that is a provider-level concern, not an
/// envelope one.
pub const MAX_TEMPERATURE: f64 = 2.0;

/// A [`RequestEnvelope`] that has passed every field contract in spec
/// §4.4. Only a `BoundEnvelope` may be handed to a Tool Base.
#[derive(Debug, Clone)]
pub struct BoundEnvelope {
    /// The user-supplied prompt text.
    pub prompt: String,
    /// Model name, alias, or the literal string `"auto"`.
    pub model: String,
    /// Absolute paths to files the tool may read. Validated absolute.
    pub absolute_file_paths: Vec<String>,
    /// Raw image references, unvalidated beyond JSON shape (feature
    /// compatibility is a provider concern, per spec §4.1).
    pub images: Vec<serde_json::Value>,
    /// Existing thread to continue, if any.
    pub continuation_id: Option<Uuid>,
    /// Absolute path to the working directory for this invocation.
    /// Validated absolute.
    pub working_directory_absolute_path: String,
    /// Sampling temperature, validated within `[0.0, 2.0]` if present.
    pub temperature: Option<f64>,
    /// Requested thinking depth, if applicable.
    pub thinking_mode: Option<ThinkingMode>,
    /// Validated workflow fields, present only for workflow-style tools.
    pub workflow: Option<BoundWorkflowFields>,
}

/// Validated workflow extension fields (spec §3, §4.6 step invariants).
#[derive(Debug, Clone)]
pub struct BoundWorkflowFields {
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
    pub hypothesis: Option<String>,
    /// Self-reported confidence.
    pub confidence: Confidence,
    /// Files already checked in this investigation. Validated absolute.
    pub files_checked: Vec<String>,
    /// Files judged relevant to the current hypothesis. Validated
    /// absolute.
    pub relevant_files: Vec<String>,
}

impl BoundWorkflowFields {
    /// Whether this is the terminal step of the investigation, per spec
    /// §3: "when `next_step_required = false`, this is the terminal
    /// step."
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !self.next_step_required
    }
}

fn require_absolute(field: &str, path: &str) -> Result<(), DispatchError> {
    if Path::new(path).is_absolute() {
        Ok(())
    } else {
        Err(DispatchError::new(
            ErrorKind::ValidationError,
            format!("field '{field}' must be an absolute path, got '{path}'"),
        ))
    }
}

fn require_all_absolute(field: &str, paths: &[String]) -> Result<(), DispatchError> {
    for p in paths {
        require_absolute(field, p)?;
    }
    Ok(())
}

/// Bind a raw [`RequestEnvelope`] for a simple (non-workflow) tool,
/// rejecting the request if `envelope.workflow` is present (a simple
/// tool's envelope schema must not carry step fields) or if any base-field
/// contract fails.
///
/// # Errors
///
/// Returns [`ErrorKind::ValidationError`] for the first contract
/// violation encountered: a non-absolute path, an empty `model`, a
/// temperature outside `[0.0, 2.0]`, or stray workflow fields.
pub fn bind_simple(envelope: RequestEnvelope) -> Result<BoundEnvelope, DispatchError> {
    if envelope.workflow.is_some() {
        return Err(DispatchError::new(
            ErrorKind::ValidationError,
            "simple tool envelope must not carry workflow step fields",
        ));
    }
    bind_base(envelope, None)
}

/// Bind a raw [`RequestEnvelope`] for a workflow-style tool, requiring
/// `envelope.workflow` to be present and validating the step invariants of
/// spec §3: `step_number ≤ total_steps`, `step_number ≥ 1`,
/// `total_steps ≥ 1`.
///
/// # Errors
///
/// As [`bind_simple`], plus [`ErrorKind::ValidationError`] if workflow
/// fields are absent or the step invariants are violated.
pub fn bind_workflow(envelope: RequestEnvelope) -> Result<BoundEnvelope, DispatchError> {
    let Some(workflow) = envelope.workflow.clone() else {
        return Err(DispatchError::new(
            ErrorKind::ValidationError,
            "workflow tool envelope is missing required step fields",
        ));
    };

    if workflow.step_number < 1 {
        return Err(DispatchError::new(
            ErrorKind::ValidationError,
            "step_number must be >= 1",
        ));
    }
    if workflow.total_steps < 1 {
        return Err(DispatchError::new(
            ErrorKind::ValidationError,
            "total_steps must be >= 1",
        ));
    }
    if workflow.step_number > workflow.total_steps {
        return Err(DispatchError::new(
            ErrorKind::ValidationError,
            format!(
                "step_number ({}) exceeds total_steps ({})",
                workflow.step_number, workflow.total_steps
            ),
        ));
    }
    require_all_absolute("files_checked", &workflow.files_checked)?;
    require_all_absolute("relevant_files", &workflow.relevant_files)?;

    let bound_workflow = BoundWorkflowFields {
        step: workflow.step,
        step_number: workflow.step_number,
        total_steps: workflow.total_steps,
        next_step_required: workflow.next_step_required,
        findings: workflow.findings,
        hypothesis: workflow.hypothesis,
        confidence: workflow.confidence,
        files_checked: workflow.files_checked,
        relevant_files: workflow.relevant_files,
    };

    bind_base(envelope, Some(bound_workflow))
}

fn bind_base(
    envelope: RequestEnvelope,
    workflow: Option<BoundWorkflowFields>,
) -> Result<BoundEnvelope, DispatchError> {
    if envelope.model.is_empty() {
        return Err(DispatchError::new(
            ErrorKind::ValidationError,
            "model must not be empty; use the literal string \"auto\" for auto-mode",
        ));
    }
    require_absolute(
        "working_directory_absolute_path",
        &envelope.working_directory_absolute_path,
    )?;
    require_all_absolute("absolute_file_paths", &envelope.absolute_file_paths)?;
    if let Some(t) = envelope.temperature
        && !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&t)
    {
        return Err(DispatchError::new(
            ErrorKind::ValidationError,
            format!("temperature {t} outside [{MIN_TEMPERATURE}, {MAX_TEMPERATURE}]"),
        ));
    }

    Ok(BoundEnvelope {
        prompt: envelope.prompt,
        model: envelope.model,
        absolute_file_paths: envelope.absolute_file_paths,
        images: envelope.images,
        continuation_id: envelope.continuation_id,
        working_directory_absolute_path: envelope.working_directory_absolute_path,
        temperature: envelope.temperature,
        thinking_mode: envelope.thinking_mode,
        workflow,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiorc_core::WorkflowFields;

    fn base_envelope() -> RequestEnvelope {
        RequestEnvelope {
            prompt: "hello".into(),
            model: "auto".into(),
            absolute_file_paths: vec![],
            images: vec![],
            continuation_id: None,
            working_directory_absolute_path: "/tmp".into(),
            temperature: None,
            thinking_mode: None,
            workflow: None,
        }
    }

    fn workflow_envelope(step_number: u32, total_steps: u32, next_step_required: bool) -> RequestEnvelope {
        let mut e = base_envelope();
        e.workflow = Some(WorkflowFields {
            step: "investigate".into(),
            step_number,
            total_steps,
            next_step_required,
            findings: String::new(),
            hypothesis: None,
            confidence: Confidence::Exploring,
            files_checked: vec![],
            relevant_files: vec![],
        });
        e
    }

    #[test]
    fn binds_a_valid_simple_envelope() {
        let bound = bind_simple(base_envelope()).unwrap();
        assert_eq!(bound.model, "auto");
        assert!(bound.workflow.is_none());
    }

    #[test]
    fn rejects_non_absolute_working_directory() {
        let mut e = base_envelope();
        e.working_directory_absolute_path = "relative/dir".into();
        let err = bind_simple(e).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ValidationError);
    }

    #[test]
    fn rejects_non_absolute_file_path() {
        let mut e = base_envelope();
        e.absolute_file_paths = vec!["not/absolute.rs".into()];
        let err = bind_simple(e).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ValidationError);
    }

    #[test]
    fn rejects_empty_model() {
        let mut e = base_envelope();
        e.model = String::new();
        let err = bind_simple(e).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ValidationError);
    }

    #[test]
    fn rejects_temperature_out_of_range() {
        let mut e = base_envelope();
        e.temperature = Some(2.5);
        let err = bind_simple(e).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ValidationError);
    }

    #[test]
    fn accepts_temperature_at_bounds() {
        let mut e = base_envelope();
        e.temperature = Some(0.0);
        assert!(bind_simple(e.clone()).is_ok());
        e.temperature = Some(2.0);
        assert!(bind_simple(e).is_ok());
    }

    #[test]
    fn simple_bind_rejects_stray_workflow_fields() {
        let err = bind_simple(workflow_envelope(1, 1, false)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ValidationError);
    }

    #[test]
    fn workflow_bind_requires_workflow_fields() {
        let err = bind_workflow(base_envelope()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ValidationError);
    }

    #[test]
    fn workflow_bind_rejects_step_number_exceeding_total() {
        let err = bind_workflow(workflow_envelope(3, 2, true)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ValidationError);
    }

    #[test]
    fn workflow_bind_accepts_terminal_step() {
        let bound = bind_workflow(workflow_envelope(3, 3, false)).unwrap();
        assert!(bound.workflow.unwrap().is_terminal());
    }

    #[test]
    fn workflow_bind_rejects_non_absolute_relevant_files() {
        let mut e = workflow_envelope(1, 2, true);
        e.workflow.as_mut().unwrap().relevant_files = vec!["relative.py".into()];
        let err = bind_workflow(e).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ValidationError);
    }
}
