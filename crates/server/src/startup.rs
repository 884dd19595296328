use std::future::Future;

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use configs::{AppConfig, CorsConfig};
use dotenvy::dotenv;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use crate::{errors::StartupError, routes, state::ServerState};

/// Exact-origin CORS for the configured front-ends; `"*"` falls back to permissive.
pub fn build_cors(cfg: &CorsConfig) -> CorsLayer {
    if cfg.allows_any() {
        return CorsLayer::very_permissive();
    }
    let origins: Vec<HeaderValue> = cfg
        .allowed_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

/// Connect (and migrate, when enabled) the database, then assemble the router.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    if cfg.database.auto_migrate {
        models::db::migrate(&db).await.map_err(|e| StartupError::Database(e.to_string()))?;
    }
    let state = ServerState::from_db(db);
    Ok(routes::build_router(state, build_cors(&cfg.cors)))
}

/// Serve until `shutdown` resolves, then drain in-flight requests.
pub async fn run_with_config<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_app(&cfg).await?;

    // Bind and serve（host 允许是主机名）
    let listener = tokio::net::TcpListener::bind((cfg.server.host.as_str(), cfg.server.port)).await?;
    let addr = listener.local_addr()?;
    info!(%addr, "article server listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("article server drained");
    Ok(())
}

/// Public entry: load config, build the app and run the HTTP server until Ctrl+C
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = AppConfig::load_or_env().map_err(|e| StartupError::InvalidConfig(format!("{e:#}")))?;
    run_with_config(cfg, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}
