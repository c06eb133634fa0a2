//! Benchmarks the History Builder's token-budgeted reconstruction (spec
//! §4.3) under a thread with many turns and embedded files, per
//! SPEC_FULL.md §B.4's ambient test-tooling stack.

use aiorc_core::{EmbeddedFile, Role, Turn};
use aiorc_store::{ConversationStore, HistoryBuilder};
use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn build_populated_thread(runtime: &tokio::runtime::Runtime, turns: usize) -> (ConversationStore, uuid::Uuid) {
    runtime.block_on(async {
        let store = ConversationStore::new();
        let id = store.create_thread("chat", serde_json::json!({})).await;
        for i in 0..turns {
            let role = if i % 2 == 0 { Role::User } else { Role::Assistant };
            let path = format!("/repo/src/file_{}.rs", i % 5);
            store
                .append_turn(
                    id,
                    Turn {
                        role,
                        content: format!("turn {i}: {}", "lorem ipsum dolor sit amet ".repeat(20)),
                        tool_name: "chat".into(),
                        model_name: None,
                        files_referenced: vec![path.clone()],
                        embedded_files: vec![EmbeddedFile::new(path, "fn main() {}\n".repeat(50))],
                        images_referenced: vec![],
                        created_at: Utc::now(),
                    },
                )
                .await
                .unwrap();
        }
        (store, id)
    })
}

fn bench_build_history(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    // aiorc-store's thread append enforces a 20-turn cap, so this
    // benchmark exercises the builder at its largest legal thread size
    // rather than an unbounded one.
    let (store, id) = build_populated_thread(&runtime, aiorc_core::MAX_TURNS);

    c.bench_function("history_builder_build_history_full_thread", |b| {
        b.iter(|| {
            runtime.block_on(async {
                let result = HistoryBuilder::new(&store).build_history(black_box(id), black_box(64_000)).await;
                black_box(result);
            });
        });
    });
}

criterion_group!(benches, bench_build_history);
criterion_main!(benches);
