//! Tool lookup (spec §4.7 step 1): dispatcher-side registration of every
//! Simple and Workflow tool this server exposes, by name.

use aiorc_core::Category;
use aiorc_tools::{SimpleTool, WorkflowTool};
use std::collections::HashMap;
use std::sync::Arc;

/// One registered tool, tagged by its execution contract. Mirrors spec
/// §9's "tagged forms, not inheritance branches" design note.
#[derive(Clone)]
pub enum ToolEntry {
    /// A single-shot tool (spec C7).
    Simple(Arc<dyn SimpleTool>),
    /// A multi-step investigation tool (spec C8).
    Workflow(Arc<dyn WorkflowTool>),
}

impl ToolEntry {
    /// The tool's registered name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Simple(t) => t.name(),
            Self::Workflow(t) => t.name(),
        }
    }

    /// The category used to size this tool's timeout. A workflow tool has
    /// no primary category of its own (intermediate steps never call a
    /// provider); its only suspension point is the optional expert call,
    /// so its `expert_category` stands in for timeout sizing.
    #[must_use]
    pub fn timeout_category(&self) -> Category {
        match self {
            Self::Simple(t) => t.category(),
            Self::Workflow(t) => t.expert_category(),
        }
    }
}

/// Every tool this server exposes, keyed by registered name.
#[derive(Default, Clone)]
pub struct ToolCatalog {
    tools: HashMap<String, ToolEntry>,
}

impl ToolCatalog {
    /// An empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a Simple tool.
    pub fn register_simple(&mut self, tool: Arc<dyn SimpleTool>) {
        self.tools.insert(tool.name().to_string(), ToolEntry::Simple(tool));
    }

    /// Register a Workflow tool.
    pub fn register_workflow(&mut self, tool: Arc<dyn WorkflowTool>) {
        self.tools.insert(tool.name().to_string(), ToolEntry::Workflow(tool));
    }

    /// Look up a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ToolEntry> {
        self.tools.get(name)
    }

    /// Every registered tool name, for diagnostics and the model-catalog
    /// surface's tool listing.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
