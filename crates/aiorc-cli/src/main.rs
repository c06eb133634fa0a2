#![deny(unsafe_code)]

mod tools;

use aiorc_config::Config;
use aiorc_dispatcher::{build_app, AppState, Dispatcher, TimeoutTable, ToolCatalog};
use aiorc_policy::RestrictionPolicy;
use aiorc_provider_mock::MockProvider;
use aiorc_registry::ProviderRegistry;
use aiorc_store::ConversationStore;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// How often the background task sweeps expired threads, independent of
/// the store's own opportunistic per-access sweep (SPEC_FULL.md §C.5).
const PERIODIC_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[derive(Parser, Debug)]
#[command(name = "aiorc", version, about = "Multi-provider AI orchestration server")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the bind address from the configuration file.
    #[arg(long)]
    bind: Option<String>,

    /// Enable debug logging.
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.debug {
        EnvFilter::new("aiorc=debug")
    } else {
        EnvFilter::new("aiorc=info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match &args.config {
        Some(path) => {
            let (config, warnings) = Config::load(path).with_context(|| format!("load config {}", path.display()))?;
            for w in warnings {
                warn!("{w}");
            }
            config
        }
        None => {
            warn!("no --config supplied; starting with an empty provider catalog");
            Config {
                bind_address: "127.0.0.1:8080".to_string(),
                providers: Default::default(),
                restriction: Default::default(),
                timeouts: Default::default(),
            }
        }
    };

    let bind_address = args.bind.unwrap_or_else(|| config.bind_address.clone());

    let (available_providers, warnings) = config.providers_with_credentials();
    for w in warnings {
        warn!("{w}");
    }

    let mut registry = ProviderRegistry::new();
    if available_providers.is_empty() {
        info!("no configured providers have credentials present; registering the mock provider");
    }
    registry.register(Arc::new(MockProvider::new()));

    let policy = RestrictionPolicy::new(&config.restriction.allow, &config.restriction.deny)
        .context("compile restriction policy globs")?;

    let timeouts = TimeoutTable::new(
        config.timeouts.fast_secs,
        config.timeouts.reasoning_secs,
        config.timeouts.coding_secs,
        config.timeouts.vision_secs,
        config.timeouts.long_context_secs,
        config.timeouts.general_secs,
    );

    let mut catalog = ToolCatalog::new();
    catalog.register_simple(Arc::new(tools::ChatTool));
    catalog.register_workflow(Arc::new(tools::DebugTool));
    catalog.register_workflow(Arc::new(tools::CodeReviewTool));

    let store = ConversationStore::new();
    let dispatcher = Arc::new(Dispatcher::new(
        catalog,
        Arc::new(registry),
        store.clone(),
        policy,
        Arc::new(tools::FsFileReader),
        timeouts,
    ));

    spawn_periodic_sweep(store);

    let app = build_app(AppState::new(Arc::clone(&dispatcher)));
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("bind {bind_address}"))?;
    info!(%bind_address, tools = ?dispatcher.tool_names(), "aiorc listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve")
}

fn spawn_periodic_sweep(store: ConversationStore) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PERIODIC_SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            let before = store.len().await;
            store.sweep_expired(chrono::Utc::now()).await;
            let after = store.len().await;
            if before != after {
                info!(swept = before - after, remaining = after, "periodic thread sweep");
            }
        }
    });
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received ctrl-c, shutting down gracefully"),
        Err(err) => warn!(%err, "failed to install ctrl-c handler"),
    }
}
