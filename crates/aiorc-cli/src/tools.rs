//! Minimal concrete tools registered by the binary so the server has
//! something to dispatch to. Prompt strings and per-tool business logic
//! beyond the shared Tool Base contracts are explicitly out-of-core (spec
//! §1); these exist to demonstrate the contract, not as the ~15-tool
//! catalog the source system ships.

use aiorc_core::Category;
use aiorc_error::{DispatchError, ErrorKind};
use aiorc_tools::files::{language_hint_for, FileMetadata, FileReader};
use aiorc_tools::{SimpleTool, WorkflowTool};

/// A general-purpose single-shot conversational tool.
pub struct ChatTool;

impl SimpleTool for ChatTool {
    fn name(&self) -> &str {
        "chat"
    }

    fn category(&self) -> Category {
        Category::General
    }

    fn system_prompt(&self) -> &str {
        "You are a helpful assistant embedded in a coding workflow. \
         Answer directly and concisely."
    }
}

/// A multi-step debugging investigation tool.
pub struct DebugTool;

impl WorkflowTool for DebugTool {
    fn name(&self) -> &str {
        "debug"
    }

    fn expert_category(&self) -> Category {
        Category::Reasoning
    }

    fn expert_system_prompt(&self) -> &str {
        "You are a senior engineer performing independent validation of a \
         debugging investigation. Approve, challenge, or extend the stated \
         findings; do not merely restate them."
    }
}

/// A multi-step code-review investigation tool.
pub struct CodeReviewTool;

impl WorkflowTool for CodeReviewTool {
    fn name(&self) -> &str {
        "codereview"
    }

    fn expert_category(&self) -> Category {
        Category::Coding
    }

    fn expert_system_prompt(&self) -> &str {
        "You are a rigorous code reviewer. Evaluate the findings for \
         correctness, security, and maintainability issues the investigation \
         may have missed."
    }
}

/// Reads file bodies and metadata straight off the local filesystem,
/// filling the [`FileReader`] seam workflow tools require.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsFileReader;

impl FileReader for FsFileReader {
    fn read(&self, path: &str) -> Result<String, DispatchError> {
        std::fs::read_to_string(path)
            .map_err(|e| DispatchError::new(ErrorKind::ValidationError, format!("cannot read file '{path}': {e}")))
    }

    fn metadata(&self, path: &str) -> Result<FileMetadata, DispatchError> {
        let meta = std::fs::metadata(path)
            .map_err(|e| DispatchError::new(ErrorKind::ValidationError, format!("cannot stat file '{path}': {e}")))?;
        Ok(FileMetadata { size_bytes: meta.len(), language_hint: language_hint_for(path) })
    }
}
