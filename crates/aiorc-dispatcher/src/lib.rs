//! aiorc-dispatcher
#![deny(unsafe_code)]
#![warn(missing_docs)]
//!
//! The Dispatcher (C9, spec §4.7): tool lookup, envelope binding,
//! category-scoped timeout enforcement, error catching, response shaping,
//! and the Axum HTTP boundary clients actually speak to.

/// Tool lookup by name (spec §4.7 step 1).
pub mod catalog;
/// Transport-agnostic dispatch algorithm and response shaping.
pub mod dispatch;
/// Axum router, handlers, and application state.
pub mod http;
/// Per-category timeout table (spec §5).
pub mod timeouts;

pub use catalog::{ToolCatalog, ToolEntry};
pub use dispatch::{DispatchResponse, Dispatcher, ErrorBody, ModelSummary};
pub use http::{build_app, ApiError, AppState};
pub use timeouts::TimeoutTable;
