//! aiorc-store
#![deny(unsafe_code)]
#![warn(missing_docs)]
//!
//! The Conversation Store (C4) and History Builder (C5): a process-global,
//! thread-keyed map of [`Thread`]s with TTL and turn-cap enforcement, plus
//! token-budgeted history reconstruction with newest-first file
//! deduplication. See spec §3 "Conversation Thread" and §4.3.

mod history;

pub use history::{effective_budget, estimate_tokens, HistoryBuilder, HistoryResult};

use aiorc_core::{Thread, Turn};
use aiorc_error::{DispatchError, ErrorKind};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

/// A single thread's mutable state, behind its own lock so that mutating
/// one conversation never blocks another (spec §5: "each thread is its
/// own critical section").
struct Slot {
    thread: Mutex<Thread>,
}

/// Process-global, thread-keyed conversation store. Cheap to clone — it is
/// a handle around an `Arc<RwLock<..>>` — so it can be shared across tool
/// invocations and the dispatcher's background sweep task alike.
#[derive(Clone, Default)]
pub struct ConversationStore {
    inner: Arc<RwLock<HashMap<Uuid, Arc<Slot>>>>,
}

impl ConversationStore {
    /// Construct an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh thread for `tool_name`, recording `initial_envelope`
    /// as its diagnostic snapshot. Returns the new thread's ID.
    pub async fn create_thread(
        &self,
        tool_name: impl Into<String>,
        initial_envelope: serde_json::Value,
    ) -> Uuid {
        self.sweep_expired(Utc::now()).await;
        let thread = Thread::new(tool_name, initial_envelope);
        let thread_id = thread.thread_id;
        let slot = Arc::new(Slot { thread: Mutex::new(thread) });
        self.inner.write().await.insert(thread_id, slot);
        info!(%thread_id, "thread created");
        thread_id
    }

    /// Look up a thread by ID, validating UUID syntax first per spec §4.3
    /// ("MUST validate that thread_id is syntactically a UUID before
    /// lookup"). Unknown or syntactically invalid IDs both return `None`
    /// rather than an error — the caller (usually a History Builder
    /// consumer) treats a miss as "begin fresh", per the `ThreadNotFound`
    /// silent-recovery policy in spec §7.
    pub async fn get_thread(&self, thread_id: &str) -> Option<Thread> {
        let id = Uuid::parse_str(thread_id).ok()?;
        self.get_thread_by_uuid(id).await
    }

    /// As [`Self::get_thread`], but takes an already-parsed [`Uuid`].
    pub async fn get_thread_by_uuid(&self, thread_id: Uuid) -> Option<Thread> {
        self.sweep_expired(Utc::now()).await;
        let slot = self.inner.read().await.get(&thread_id).cloned()?;
        let mut guard = slot.thread.lock().await;
        if guard.is_expired(Utc::now()) {
            return None;
        }
        guard.last_accessed_at = Utc::now();
        Some(guard.clone())
    }

    /// Append a turn to `thread_id`, refreshing `last_accessed_at`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ThreadNotFound`] if the ID is absent or
    /// expired, and [`ErrorKind::ThreadCapacityExceeded`] if the thread is
    /// already at the 20-turn cap — in the latter case the thread is left
    /// completely unmutated (spec §8 property 3).
    pub async fn append_turn(&self, thread_id: Uuid, turn: Turn) -> Result<(), DispatchError> {
        let slot = {
            let threads = self.inner.read().await;
            threads.get(&thread_id).cloned()
        };
        let Some(slot) = slot else {
            return Err(DispatchError::new(
                ErrorKind::ThreadNotFound,
                format!("thread '{thread_id}' not found"),
            ));
        };

        let mut guard = slot.thread.lock().await;
        if guard.is_expired(Utc::now()) {
            return Err(DispatchError::new(
                ErrorKind::ThreadNotFound,
                format!("thread '{thread_id}' expired"),
            ));
        }
        if guard.is_at_capacity() {
            return Err(DispatchError::new(
                ErrorKind::ThreadCapacityExceeded,
                format!("thread '{thread_id}' already holds the maximum of {} turns", aiorc_core::MAX_TURNS),
            ));
        }
        guard.turns.push(turn);
        guard.last_accessed_at = Utc::now();
        debug!(%thread_id, turns = guard.turns.len(), "turn appended");
        Ok(())
    }

    /// Remove every thread whose `last_accessed_at` is more than the TTL
    /// stale as of `now`. Called opportunistically on every store access
    /// (spec §4.3); safe to additionally invoke from a periodic
    /// background task. Holds the store-wide lock only for the map
    /// mutation itself, never across a provider call, per spec §5.
    pub async fn sweep_expired(&self, now: DateTime<Utc>) {
        let expired: Vec<Uuid> = {
            let threads = self.inner.read().await;
            let mut ids = Vec::new();
            for (id, slot) in threads.iter() {
                if slot.thread.lock().await.is_expired(now) {
                    ids.push(*id);
                }
            }
            ids
        };
        if expired.is_empty() {
            return;
        }
        let mut threads = self.inner.write().await;
        for id in &expired {
            threads.remove(id);
        }
        info!(count = expired.len(), "swept expired threads");
    }

    /// Number of threads currently tracked, including any not yet swept.
    /// Intended for diagnostics/tests, not the hot path.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Whether the store currently tracks no threads.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
