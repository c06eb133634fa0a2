//! Per-category wall-clock timeouts applied to a tool invocation (spec §5
//! "Timeouts", §4.7 step 3: "under a best-effort timeout appropriate to
//! the tool category").

use aiorc_core::Category;
use std::time::Duration;

/// Category-keyed timeout table. Falls back to the `general` entry for any
/// category not explicitly set.
#[derive(Debug, Clone)]
pub struct TimeoutTable {
    fast: Duration,
    reasoning: Duration,
    coding: Duration,
    vision: Duration,
    long_context: Duration,
    general: Duration,
}

impl TimeoutTable {
    /// Build a table from per-category second counts.
    #[must_use]
    pub fn new(fast_secs: u64, reasoning_secs: u64, coding_secs: u64, vision_secs: u64, long_context_secs: u64, general_secs: u64) -> Self {
        Self {
            fast: Duration::from_secs(fast_secs),
            reasoning: Duration::from_secs(reasoning_secs),
            coding: Duration::from_secs(coding_secs),
            vision: Duration::from_secs(vision_secs),
            long_context: Duration::from_secs(long_context_secs),
            general: Duration::from_secs(general_secs),
        }
    }

    /// The timeout to apply for `category`.
    #[must_use]
    pub fn for_category(&self, category: Category) -> Duration {
        match category {
            Category::Fast => self.fast,
            Category::Reasoning => self.reasoning,
            Category::Coding => self.coding,
            Category::Vision => self.vision,
            Category::LongContext => self.long_context,
            Category::General => self.general,
        }
    }
}

impl Default for TimeoutTable {
    fn default() -> Self {
        Self::new(60, 300, 300, 60, 300, 60)
    }
}
