//! ZION.CITY user cache server
//!
//! Serves cached user lookups and a general-purpose TTL cache over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zion_cache::api::create_router;
use zion_cache::cache::{ExpirySweep, NamedStore};
use zion_cache::users::{registry, DocumentStore, MemoryDocumentStore};
use zion_cache::{spawn_cleanup_task, AppState, Config};

/// Main entry point for the user cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the user document store and build both caches
/// 4. Install the user lookup for code that cannot receive it explicitly
/// 5. Warm the user cache with the seeded users through the installed lookup
/// 6. Start background TTL sweep task
/// 7. Serve the HTTP API until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zion_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ZION.CITY user cache server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: generic_ttl={}s, user_ttl={}s, port={}, cleanup_interval={}s",
        config.generic_cache_ttl, config.user_cache_ttl, config.server_port, config.cleanup_interval
    );

    let seeded = open_user_store(&config).await?;
    let seeded_ids = seeded.ids().await;
    let store: Arc<dyn DocumentStore> = Arc::new(seeded);
    let state = AppState::from_config(&config, store);
    registry::install(state.users.clone())?;
    info!("Caches initialized");

    if !seeded_ids.is_empty() {
        let warmed = registry::get_users_by_ids(seeded_ids.as_slice())
            .await
            .context("failed to warm user cache")?;
        info!("Warmed user cache with {} users", warmed.len());
    }

    let sweeps: Vec<Arc<dyn ExpirySweep>> = vec![
        Arc::new(NamedStore {
            name: "generic".to_string(),
            store: state.cache.clone(),
        }),
        Arc::new(NamedStore {
            name: "users".to_string(),
            store: state.users.cache().clone(),
        }),
    ];
    let cleanup_handle = spawn_cleanup_task(sweeps, config.cleanup_interval);

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Builds the in-memory user collection, seeded from `USER_SEED_FILE` if set.
async fn open_user_store(config: &Config) -> anyhow::Result<MemoryDocumentStore> {
    let Some(path) = &config.user_seed_file else {
        warn!("USER_SEED_FILE not set, starting with an empty user store");
        return Ok(MemoryDocumentStore::new());
    };

    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let store = MemoryDocumentStore::from_json(&raw)
        .with_context(|| format!("invalid user seed file {}", path.display()))?;
    info!("Loaded {} users from {}", store.len().await, path.display());
    Ok(store)
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the cleanup task and allows graceful shutdown.
async fn shutdown_signal(cleanup_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    cleanup_handle.abort();
    warn!("Cleanup task aborted");
}
