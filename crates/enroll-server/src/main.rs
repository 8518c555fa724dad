//! Student Enrollment Server
//!
//! REST API in front of the student directory: a hosted document database
//! with an in-memory fallback store.

mod config;
mod handlers;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use enroll_core::{FallbackStore, StudentDirectory, VendorClient};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::ServerConfig;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<StudentDirectory>,
}

#[tokio::main]
async fn main() {
    // Set up panic hook to log crashes
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("enroll_server=info,enroll_core=info,tower_http=info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!(
        "Starting Student Enrollment Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    if let Err(e) = run_server().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<()> {
    info!("Loading configuration...");
    let config = ServerConfig::load().context("Failed to load configuration")?;
    info!(
        "Config loaded: bind={}, vendor={}, db={}/{}",
        config.bind_address, config.vendor_url, config.db_name, config.relation
    );
    if config.uses_default_token() {
        warn!("ENROLL_VENDOR_TOKEN / JPDB_TOKEN not set, using the built-in demo token");
    }

    let vendor = VendorClient::new(config.vendor()).context("Failed to create vendor client")?;
    let fallback = Arc::new(FallbackStore::new());
    let directory = Arc::new(StudentDirectory::new(Arc::new(vendor), fallback));
    info!("Student directory initialized");

    let state = AppState { directory };
    let app = router(state, config.static_dir.as_deref());

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

pub fn router(state: AppState, static_dir: Option<&str>) -> Router {
    let mut app = Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_routes());

    if let Some(dir) = static_dir {
        info!("Serving form front-end from {}", dir);
        let index_path = PathBuf::from(dir).join("index.html");
        // SPA fallback - unknown paths serve index.html
        app = app.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index_path)));
    }

    app.layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

fn api_routes() -> Router<AppState> {
    use handlers::students;

    Router::new()
        .route("/students", get(students::list).post(students::create))
        .route(
            "/students/:roll_no",
            get(students::get)
                .put(students::update)
                .delete(students::delete),
        )
        .route("/students/:roll_no/exists", get(students::exists))
        .route("/stats", get(students::stats))
}
