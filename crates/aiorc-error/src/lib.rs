//! aiorc-error
#![deny(unsafe_code)]
#![warn(missing_docs)]
//!
//! The stable error-kind taxonomy surfaced by every component of the
//! orchestration server. Every kind here corresponds to a row in the error
//! handling table of the governing specification; the string returned by
//! [`ErrorKind::code`] is part of the wire contract and must not change once
//! shipped.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The kind of failure a dispatcher-visible operation can report.
///
/// Each variant corresponds to one row of the error taxonomy: envelope
/// validation, registry/model resolution, conversation-store capacity, and
/// upstream provider failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Envelope field invalid (bad path, bad UUID, step invariants).
    ValidationError,
    /// Dispatcher cannot find the named tool.
    UnknownTool,
    /// Registry has no canonical or alias match for the requested model.
    UnknownModel,
    /// Restriction policy blocks this model.
    ModelRestricted,
    /// Auto-mode found no eligible candidate.
    NoEligibleModel,
    /// Model lacks a capability the request requires (e.g. images).
    FeatureUnsupported,
    /// `continuation_id` has valid syntax but is unknown or expired.
    ThreadNotFound,
    /// The thread's 20-turn cap has been reached.
    ThreadCapacityExceeded,
    /// Provider transport or HTTP failure.
    UpstreamError,
    /// Caller cancelled the invocation before it completed.
    Cancelled,
    /// Unexpected failure with no more specific classification.
    InternalError,
}

impl ErrorKind {
    /// Stable wire code for this kind, e.g. `"unknown_model"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use aiorc_error::ErrorKind;
    /// assert_eq!(ErrorKind::UnknownModel.code(), "unknown_model");
    /// ```
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::ValidationError => "validation_error",
            Self::UnknownTool => "unknown_tool",
            Self::UnknownModel => "unknown_model",
            Self::ModelRestricted => "model_restricted",
            Self::NoEligibleModel => "no_eligible_model",
            Self::FeatureUnsupported => "feature_unsupported",
            Self::ThreadNotFound => "thread_not_found",
            Self::ThreadCapacityExceeded => "thread_capacity_exceeded",
            Self::UpstreamError => "upstream_error",
            Self::Cancelled => "cancelled",
            Self::InternalError => "internal_error",
        }
    }

    /// Whether this kind is ever locally recoverable without surfacing to
    /// the caller (per the governing specification: only `ThreadNotFound`
    /// and a failed expert-validation call recover silently).
    #[must_use]
    pub fn is_locally_recoverable(self) -> bool {
        matches!(self, Self::ThreadNotFound)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A dispatcher-visible error: kind, human message, and optional structured
/// details (e.g. `{"retryable": true}` for upstream failures, or
/// `{"correlation_id": "..."}` for internal errors).
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
#[error("[{kind}] {message}")]
pub struct DispatchError {
    /// The error kind.
    pub kind: ErrorKind,
    /// Human-readable message. Never interpolates secrets or credentials.
    pub message: String,
    /// Structured machine-readable detail payload, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl DispatchError {
    /// Build an error of the given kind with a message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    /// Attach structured detail.
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Construct an `UpstreamError` carrying its `retryable` flag in
    /// `details`, per the provider failure contract.
    pub fn upstream(message: impl Into<String>, retryable: bool) -> Self {
        Self::new(ErrorKind::UpstreamError, message)
            .with_details(serde_json::json!({ "retryable": retryable }))
    }

    /// Construct an `InternalError` tagged with a correlation ID so a log
    /// line can be located from the response alone.
    pub fn internal(message: impl Into<String>, correlation_id: Uuid) -> Self {
        Self::new(ErrorKind::InternalError, message)
            .with_details(serde_json::json!({ "correlation_id": correlation_id }))
    }

    /// `true` when this error's `details.retryable` flag is set (only
    /// meaningful for [`ErrorKind::UpstreamError`]).
    #[must_use]
    pub fn retryable(&self) -> bool {
        self.details
            .as_ref()
            .and_then(|d| d.get("retryable"))
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_snake_case_and_stable() {
        assert_eq!(ErrorKind::ValidationError.code(), "validation_error");
        assert_eq!(
            ErrorKind::ThreadCapacityExceeded.code(),
            "thread_capacity_exceeded"
        );
    }

    #[test]
    fn only_thread_not_found_is_locally_recoverable() {
        assert!(ErrorKind::ThreadNotFound.is_locally_recoverable());
        assert!(!ErrorKind::UpstreamError.is_locally_recoverable());
        assert!(!ErrorKind::ValidationError.is_locally_recoverable());
    }

    #[test]
    fn upstream_error_carries_retryable_flag() {
        let e = DispatchError::upstream("gateway timeout", true);
        assert!(e.retryable());
        let e2 = DispatchError::upstream("bad request", false);
        assert!(!e2.retryable());
    }

    #[test]
    fn internal_error_carries_correlation_id() {
        let id = Uuid::new_v4();
        let e = DispatchError::internal("panic in handler", id);
        assert_eq!(
            e.details.unwrap()["correlation_id"],
            serde_json::json!(id)
        );
    }

    #[test]
    fn display_matches_code_and_message() {
        let e = DispatchError::new(ErrorKind::UnknownTool, "no such tool: frobnicate");
        assert_eq!(e.to_string(), "[unknown_tool] no such tool: frobnicate");
    }
}
