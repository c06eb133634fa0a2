//! Conversation Thread and Turn (C4 data model).

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of turns a single thread may hold. Appending a turn that
/// would exceed this is rejected with `ThreadCapacityExceeded`, never
/// silently truncated.
pub const MAX_TURNS: usize = 20;

/// How long a thread may sit idle before it becomes eligible for eviction
/// by the store's TTL sweep.
pub const THREAD_TTL: std::time::Duration = std::time::Duration::from_secs(3 * 60 * 60);

/// Who authored a [`Turn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A turn supplied by the calling client.
    User,
    /// A turn produced by a provider.
    Assistant,
}

/// A file's content as it stood at the moment a turn referenced it. Stored
/// alongside `files_referenced` so the History Builder can resolve "newest
/// occurrence wins" (spec §4.3 step 3, §9 open question 2) without
/// re-reading the filesystem and risking a version that postdates the
/// turn — the spec is explicit that historical versions are never
/// reconciled, only the newest kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EmbeddedFile {
    /// Absolute path, matching one entry of the turn's `files_referenced`.
    pub path: String,
    /// File content as captured when this turn was recorded.
    pub content: String,
    /// Byte length of `content`, cached so reference-only embedding
    /// (PLANNING phase) need not materialize the body to report a size.
    pub size_bytes: u64,
    /// Best-effort language hint derived from the file extension, used by
    /// reference-only embedding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_hint: Option<String>,
}

impl EmbeddedFile {
    /// Capture a snapshot of `path` with the given `content`, deriving a
    /// language hint from the file extension.
    #[must_use]
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        let path = path.into();
        let content = content.into();
        let language_hint = std::path::Path::new(&path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_string);
        Self {
            size_bytes: content.len() as u64,
            content,
            path,
            language_hint,
        }
    }
}

/// A reference to an image, either by path or as an inline blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageReference {
    /// An absolute filesystem path to an image.
    Path {
        /// Absolute path.
        path: String,
    },
    /// An inline, base64-encoded image blob.
    Inline {
        /// Base64-encoded bytes.
        data_base64: String,
        /// MIME type, e.g. `"image/png"`.
        mime_type: String,
    },
}

/// One user or assistant message within a [`Thread`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Turn {
    /// Who authored this turn.
    pub role: Role,
    /// Message text.
    pub content: String,
    /// Name of the tool that produced (or received, for user turns) this
    /// turn.
    pub tool_name: String,
    /// Model that produced this turn. Absent for user turns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    /// Absolute file paths referenced by this turn, in call order.
    #[serde(default)]
    pub files_referenced: Vec<String>,
    /// Content snapshots for a subset (or all) of `files_referenced`,
    /// captured at append time. Empty for turns that only announce intent
    /// (e.g. a PLANNING-phase turn, per spec §4.6 file embedding policy).
    #[serde(default)]
    pub embedded_files: Vec<EmbeddedFile>,
    /// Images referenced by this turn, in call order.
    #[serde(default)]
    pub images_referenced: Vec<ImageReference>,
    /// When this turn was recorded.
    pub created_at: DateTime<Utc>,
}

/// A thread-keyed conversation: an ordered sequence of turns plus metadata
/// bridging the stateless request protocol to stateful multi-turn
/// workflows. See spec §3 "Conversation Thread (C4)".
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Thread {
    /// Globally unique thread identifier.
    pub thread_id: Uuid,
    /// Back-reference to a parent thread this one forked from, if any. A
    /// lookup key only — never an ownership relationship.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_thread_id: Option<Uuid>,
    /// When the thread was created.
    pub created_at: DateTime<Utc>,
    /// Last time any operation touched this thread. Drives TTL eviction.
    pub last_accessed_at: DateTime<Utc>,
    /// Name of the tool that first created this thread.
    pub tool_name_first: String,
    /// Opaque snapshot of the envelope that created the thread, preserved
    /// for diagnostics; never reparsed by the store itself.
    pub initial_request_snapshot: serde_json::Value,
    /// Ordered turns, oldest first. Length is bounded by [`MAX_TURNS`].
    pub turns: Vec<Turn>,
}

impl Thread {
    /// Start a fresh thread with no turns.
    #[must_use]
    pub fn new(tool_name: impl Into<String>, initial_request_snapshot: serde_json::Value) -> Self {
        let now = Utc::now();
        Self {
            thread_id: Uuid::new_v4(),
            parent_thread_id: None,
            created_at: now,
            last_accessed_at: now,
            tool_name_first: tool_name.into(),
            initial_request_snapshot,
            turns: Vec::new(),
        }
    }

    /// Whether this thread has been idle longer than [`THREAD_TTL`] as of
    /// `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match (now - self.last_accessed_at).to_std() {
            Ok(idle) => idle > THREAD_TTL,
            Err(_) => false, // last_accessed_at is in the future; not expired.
        }
    }

    /// Whether the thread is already at [`MAX_TURNS`] and cannot accept
    /// another append.
    #[must_use]
    pub fn is_at_capacity(&self) -> bool {
        self.turns.len() >= MAX_TURNS
    }
}
