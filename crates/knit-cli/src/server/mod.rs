//! HTTP surface for `knit serve`.
//!
//! | route | purpose |
//! |---|---|
//! | `GET /api/health` | liveness, returns `OK` |
//! | `POST /api/project` | multipart `file` = zip archive, returns `{session_id, result}` |
//! | `GET /api/dependencies/{session_id}` | cached result of an earlier upload |
//! | `POST /api/knit/analyze` | multipart `file` = one source file, returns a file report |

pub mod error;
pub mod handlers;
pub mod sessions;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use knit_backend_kotlin::KotlinBackend;
use knit_config::{KnitConfig, ServerSettings};
use sessions::SessionStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

/// Shared state for all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub backend: Arc<KotlinBackend>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(backend: KotlinBackend, cache_capacity: usize) -> Self {
        Self {
            backend: Arc::new(backend),
            sessions: Arc::new(SessionStore::new(cache_capacity)),
        }
    }

    pub fn from_config(config: &KnitConfig) -> Self {
        Self::new(
            KotlinBackend::from_config(config),
            config.server.cache_capacity,
        )
    }
}

/// CORS policy for the configured frontend origins
pub fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer> {
    let origins = allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]))
}

pub fn create_router(state: AppState, settings: &ServerSettings) -> Result<Router> {
    Ok(Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/project", post(handlers::upload_project))
        .route(
            "/api/dependencies/{session_id}",
            get(handlers::get_dependencies),
        )
        .route("/api/knit/analyze", post(handlers::analyze_file))
        .layer(DefaultBodyLimit::max(settings.max_upload_bytes))
        .with_state(state)
        .layer(cors_layer(&settings.allowed_origins)?)
        .layer(TraceLayer::new_for_http()))
}

/// Binds and serves until Ctrl+C or SIGTERM.
pub async fn serve(config: &KnitConfig, bind: Option<String>) -> Result<()> {
    let address = bind.unwrap_or_else(|| config.server.bind_address.clone());
    let router = create_router(AppState::from_config(config), &config.server)?;

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!(address = %address, "knit server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("knit server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_accepts_default_origin() {
        let settings = ServerSettings::default();
        assert!(cors_layer(&settings.allowed_origins).is_ok());
    }

    #[test]
    fn test_cors_layer_rejects_unparseable_origin() {
        let err = cors_layer(&["http://bad\norigin".to_string()]).unwrap_err();
        assert!(err.to_string().contains("Invalid CORS origin"));
    }

    #[test]
    fn test_router_builds_from_defaults() {
        let config = KnitConfig::default();
        assert!(create_router(AppState::from_config(&config), &config.server).is_ok());
    }
}
