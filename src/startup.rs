use crate::config::{Config, StoreBackend};
use crate::error::Error;
use crate::store::{FileRosterStore, InMemoryRosterStore, RedisRosterStore, RosterStore};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Config(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Open the configured roster store
pub fn open_store(backend: &StoreBackend) -> Arc<dyn RosterStore> {
    match backend {
        StoreBackend::Memory => {
            info!("Using in-memory roster store");
            Arc::new(InMemoryRosterStore::new())
        }
        StoreBackend::File { path } => {
            info!("Using roster file {}", path.display());
            Arc::new(FileRosterStore::new(path.clone()))
        }
        StoreBackend::Redis { url } => match RedisRosterStore::new(url) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                // Log the error and fall back to memory
                error!("Failed to create Redis store: {}", e);
                info!("Using in-memory roster store as fallback");
                Arc::new(InMemoryRosterStore::new())
            }
        },
    }
}

/// Bind the JSON API and serve until a shutdown signal arrives
#[cfg(feature = "web-interface")]
pub async fn serve(config: &Config, roster: crate::service::RosterHandle) -> miette::Result<()> {
    use crate::web::{router, AppState};
    use std::net::SocketAddr;
    use tokio::sync::oneshot;

    let state = AppState {
        roster: roster.clone(),
        timezone: config.tz()?,
    };
    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(Error::from)?;

    // Spawn signal handler task
    let (shutdown_send, shutdown_recv) = oneshot::channel();
    tokio::spawn(async move {
        crate::shutdown::handle_signals(shutdown_send, roster).await;
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_recv.await;
        })
        .await
        .map_err(Error::from)?;

    info!("Server stopped");
    Ok(())
}
