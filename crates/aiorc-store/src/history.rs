//! History Builder (C5): token-budgeted reconstruction of prompt history
//! from a thread's turns. See spec §4.3.

use crate::ConversationStore;
use aiorc_core::{EmbeddedFile, Message, Role};
use std::collections::HashSet;
use uuid::Uuid;

/// The reconstructed history handed back to a tool: chronologically
/// ordered messages, the deduplicated set of embedded files actually
/// retained, and the token count consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryResult {
    /// Prompt messages, oldest first, ready to prepend to the current
    /// user turn.
    pub messages: Vec<Message>,
    /// Files retained after newest-first dedup and budget eviction,
    /// ordered oldest-first by the turn that first referenced them.
    pub embedded_files: Vec<EmbeddedFile>,
    /// Tokens actually consumed by `messages` and `embedded_files`
    /// combined, per the coarse estimator in [`estimate_tokens`].
    pub tokens_used: u32,
}

/// Coarse 4-chars-per-token estimator, per spec §9 "Token estimation".
/// Implementations may plug in a per-provider estimator; this one is the
/// store's own baseline, used when no sharper estimate is available.
#[must_use]
pub fn estimate_tokens(text: &str) -> u32 {
    (text.len() as u32).div_ceil(4).max(1)
}

/// Compute the usable token budget for history reconstruction, reserving
/// headroom for the downstream provider's output cap and a safety margin,
/// per spec §4.3: `min(token_budget, context_window - max_output_tokens -
/// safety_margin)`.
#[must_use]
pub fn effective_budget(
    token_budget: u32,
    context_window_tokens: u32,
    max_output_tokens: u32,
    safety_margin: u32,
) -> u32 {
    let model_cap = context_window_tokens
        .saturating_sub(max_output_tokens)
        .saturating_sub(safety_margin);
    token_budget.min(model_cap)
}

/// Reconstructs prompt history from a [`ConversationStore`] thread within a
/// token budget.
pub struct HistoryBuilder<'a> {
    store: &'a ConversationStore,
}

impl<'a> HistoryBuilder<'a> {
    /// Build a history reconstructor over `store`.
    #[must_use]
    pub fn new(store: &'a ConversationStore) -> Self {
        Self { store }
    }

    /// Reconstruct a thread's history within `token_budget`, per spec
    /// §4.3 steps 1-6.
    ///
    /// Returns an empty [`HistoryResult`] (not an error) if `thread_id` is
    /// missing or expired — the caller treats that as "begin fresh",
    /// matching the `ThreadNotFound` silent-recovery policy in spec §7.
    pub async fn build_history(&self, thread_id: Uuid, token_budget: u32) -> HistoryResult {
        let Some(thread) = self.store.get_thread_by_uuid(thread_id).await else {
            return HistoryResult::default();
        };

        // Step 3: newest-first file dedup. Walk turns newest-to-oldest so
        // the first occurrence of a path we see is the most recent one;
        // remember each file's originating turn index so retained files
        // can be re-ordered chronologically afterward (step 5).
        let mut seen_paths: HashSet<&str> = HashSet::new();
        let mut files_newest_first: Vec<(usize, &EmbeddedFile)> = Vec::new();
        for (idx, turn) in thread.turns.iter().enumerate().rev() {
            for ef in &turn.embedded_files {
                if seen_paths.insert(ef.path.as_str()) {
                    files_newest_first.push((idx, ef));
                }
            }
        }

        let mut remaining = token_budget;
        let mut tokens_used: u32 = 0;

        // Step 2/4: messages take priority over files. Walk newest-to-oldest
        // so that, when the budget runs out, it is the oldest turns that
        // get evicted rather than the most recent ones. A message is never
        // partially included.
        let mut kept_messages: Vec<(usize, Message)> = Vec::new();
        for (idx, turn) in thread.turns.iter().enumerate().rev() {
            let cost = estimate_tokens(&turn.content);
            if cost > remaining {
                continue;
            }
            let role = match turn.role {
                Role::User => Message::user(turn.content.clone()),
                Role::Assistant => Message::assistant(turn.content.clone()),
            };
            remaining -= cost;
            tokens_used += cost;
            kept_messages.push((idx, role));
        }

        // Files: newest-first order already established; include while
        // budget allows, oldest (i.e. later in this newest-first list)
        // evicted first by simply running out of budget.
        let mut kept_files: Vec<(usize, EmbeddedFile)> = Vec::new();
        for (idx, ef) in files_newest_first {
            let cost = estimate_tokens(&ef.content);
            if cost > remaining {
                continue;
            }
            remaining -= cost;
            tokens_used += cost;
            kept_files.push((idx, ef.clone()));
        }

        // Step 5: re-order chronologically (oldest-first) for the outgoing
        // prompt.
        kept_messages.sort_by_key(|(idx, _)| *idx);
        kept_files.sort_by_key(|(idx, _)| *idx);

        HistoryResult {
            messages: kept_messages.into_iter().map(|(_, m)| m).collect(),
            embedded_files: kept_files.into_iter().map(|(_, f)| f).collect(),
            tokens_used,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiorc_core::Turn;
    use chrono::Utc;

    fn turn_with_file(role: Role, content: &str, path: &str, file_content: &str) -> Turn {
        Turn {
            role,
            content: content.into(),
            tool_name: "chat".into(),
            model_name: None,
            files_referenced: vec![path.into()],
            embedded_files: vec![EmbeddedFile::new(path, file_content)],
            images_referenced: vec![],
            created_at: Utc::now(),
        }
    }

    fn plain_turn(role: Role, content: &str) -> Turn {
        Turn {
            role,
            content: content.into(),
            tool_name: "chat".into(),
            model_name: None,
            files_referenced: vec![],
            embedded_files: vec![],
            images_referenced: vec![],
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn missing_thread_returns_empty_history_not_error() {
        let store = ConversationStore::new();
        let result = HistoryBuilder::new(&store).build_history(Uuid::new_v4(), 10_000).await;
        assert_eq!(result, HistoryResult::default());
    }

    #[tokio::test]
    async fn dedups_to_newest_content_for_a_repeated_path() {
        let store = ConversationStore::new();
        let id = store.create_thread("chat", serde_json::json!({})).await;
        store
            .append_turn(id, turn_with_file(Role::User, "first look", "/tmp/a.txt", "v1"))
            .await
            .unwrap();
        store
            .append_turn(id, plain_turn(Role::Assistant, "ack"))
            .await
            .unwrap();
        store
            .append_turn(id, turn_with_file(Role::User, "updated", "/tmp/a.txt", "v2"))
            .await
            .unwrap();

        let result = HistoryBuilder::new(&store).build_history(id, 100_000).await;
        let files: Vec<_> = result.embedded_files.iter().filter(|f| f.path == "/tmp/a.txt").collect();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].content, "v2");
    }

    #[tokio::test]
    async fn messages_come_back_chronologically_ordered() {
        let store = ConversationStore::new();
        let id = store.create_thread("chat", serde_json::json!({})).await;
        store.append_turn(id, plain_turn(Role::User, "first")).await.unwrap();
        store.append_turn(id, plain_turn(Role::Assistant, "second")).await.unwrap();
        store.append_turn(id, plain_turn(Role::User, "third")).await.unwrap();

        let result = HistoryBuilder::new(&store).build_history(id, 100_000).await;
        let contents: Vec<&str> = result.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn tight_budget_evicts_oldest_messages_first() {
        let store = ConversationStore::new();
        let id = store.create_thread("chat", serde_json::json!({})).await;
        // Each message costs ceil(len/4) tokens; "aaaa" => 1 token, repeated.
        store.append_turn(id, plain_turn(Role::User, &"a".repeat(40))).await.unwrap();
        store.append_turn(id, plain_turn(Role::Assistant, &"b".repeat(40))).await.unwrap();
        store.append_turn(id, plain_turn(Role::User, &"c".repeat(40))).await.unwrap();

        // Budget for exactly the newest message (10 tokens) plus a
        // little slack, not enough for all three.
        let result = HistoryBuilder::new(&store).build_history(id, 12).await;
        assert_eq!(result.messages.len(), 1);
        assert!(result.messages[0].content.starts_with('c'));
    }

    #[tokio::test]
    async fn effective_budget_reserves_output_cap_and_margin() {
        assert_eq!(effective_budget(50_000, 128_000, 8_000, 1_000), 50_000);
        assert_eq!(effective_budget(200_000, 128_000, 8_000, 1_000), 119_000);
    }

    #[tokio::test]
    async fn zero_remaining_budget_yields_empty_result() {
        let store = ConversationStore::new();
        let id = store.create_thread("chat", serde_json::json!({})).await;
        store.append_turn(id, plain_turn(Role::User, "hello")).await.unwrap();

        let result = HistoryBuilder::new(&store).build_history(id, 0).await;
        assert!(result.messages.is_empty());
        assert_eq!(result.tokens_used, 0);
    }
}
