//! # mdbctl: Administrative Control Layer for MongoDB
//!
//! `mdbctl` is a small control plane for provisioning and inspecting MongoDB
//! deployments. It provides a RESTful management API for creating and
//! dropping databases, listing databases and collections, moving JSON data in
//! and out of collections, and, at the heart of the service, capturing and
//! restoring compressed snapshots by orchestrating the external
//! `mongodump`/`mongorestore` tools and a container copy step.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for
//! the HTTP layer. There is deliberately no persistence of its own: all state
//! lives in the managed deployment, and the only local artifacts are scratch
//! files that are removed before a request finishes.
//!
//! ### Request Flow
//!
//! Management requests under `/admin/api/v1/*` reach handlers in [`api`].
//! Catalog operations (listing, provisioning, JSON transfer) go through
//! [`db::catalog::Catalog`], which owns a lazily-initialized driver handle
//! that reconnects when stale. Backup and restore requests go through the
//! services in [`ops`], which spawn external tools through the
//! [`ops::command::ToolRunner`] seam; the seam is what lets the whole
//! pipeline run against a scripted stub in tests.
//!
//! ### Core Components
//!
//! The **API layer** ([`api`]) exposes the management surface and maps
//! component errors onto HTTP responses through [`errors::Error`].
//!
//! The **pipeline layer** ([`ops`]) implements backup capture and the
//! copy-invoke-cleanup restore sequence, with scratch-file discipline
//! ([`ops::scratch::ScratchFile`]) guaranteeing that temporary archives never
//! outlive their request.
//!
//! The **database layer** ([`db`]) wraps the MongoDB driver for catalog
//! operations.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use mdbctl::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Parse CLI arguments and load configuration
//!     let args = mdbctl::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     // Initialize structured logging
//!     mdbctl::telemetry::init_telemetry()?;
//!
//!     // Create and start the application
//!     let app = Application::new(config)?;
//!
//!     // Run with graceful shutdown on Ctrl+C
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     }).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options, including the
//! deliberately separate capture and restore connection targets.

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod ops;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

use crate::db::catalog::Catalog;
use crate::db::MongoHandle;
use crate::openapi::ApiDoc;
use crate::ops::capture::BackupCapture;
use crate::ops::command::{SystemRunner, ToolRunner};
use crate::ops::restore::RestorePipeline;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::{
    Router,
    routing::{delete, get, post},
};
use bon::Builder;
pub use config::Config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// Application state shared across all request handlers.
///
/// Everything in here is cheap to clone: the catalog shares one cached driver
/// client, and the pipeline services are reference-counted.
#[derive(Clone, Builder)]
pub struct AppState {
    pub config: Config,
    pub catalog: Catalog,
    pub backups: Arc<BackupCapture>,
    pub restores: Arc<RestorePipeline>,
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors = &config.cors;

    let mut layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(cors.allow_credentials);

    if cors.allowed_origins.iter().any(|origin| origin == "*") {
        layer = layer.allow_origin(tower_http::cors::Any);
    } else {
        let mut origins = Vec::new();
        for origin in &cors.allowed_origins {
            origins.push(origin.parse::<HeaderValue>()?);
        }
        layer = layer.allow_origin(origins);
    }

    Ok(layer)
}

/// Build the main application router with all endpoints and middleware.
///
/// - Management API under `/admin/api/v1`
/// - Health endpoint at `/healthz`
/// - OpenAPI documentation at `/admin/docs`
/// - CORS and tracing layers
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let max_upload_size = state.config.restore.max_upload_size as usize;

    let api_routes = Router::new()
        .route("/backups", post(api::handlers::backups::create_backup))
        // Restore uploads whole archives; give this route its own body limit
        .route(
            "/backups/restore",
            post(api::handlers::backups::restore_backup).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/databases", get(api::handlers::databases::list_databases))
        .route("/databases", post(api::handlers::databases::create_database))
        .route("/databases/{db}", delete(api::handlers::databases::delete_database))
        .route("/databases/{db}/collections", get(api::handlers::collections::list_collections))
        .route(
            "/databases/{db}/collections/{collection}/documents",
            get(api::handlers::collections::export_collection),
        )
        .route(
            "/databases/{db}/collections/{collection}/documents",
            post(api::handlers::collections::import_collection),
        )
        .with_state(state.clone());

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .nest("/admin/api/v1", api_routes)
        .merge(Scalar::with_url("/admin/docs", ApiDoc::openapi()));

    let cors_layer = create_cors_layer(&state.config)?;

    let router = router.layer(cors_layer).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// Main application struct that owns all resources and lifecycle.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] wires up the catalog handle and the
///    pipeline services. Nothing connects yet; the driver handle is lazy.
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and handles
///    requests until the shutdown future resolves.
pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    /// Create a new application instance using the real process runner.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        Self::with_runner(config, Arc::new(SystemRunner))
    }

    /// Create an application with an injected [`ToolRunner`] (tests use a
    /// scripted stub here).
    pub fn with_runner(config: Config, runner: Arc<dyn ToolRunner>) -> anyhow::Result<Self> {
        let catalog = Catalog::new(MongoHandle::new(&config.mongo.uri));
        let backups = Arc::new(BackupCapture::new(&config, runner.clone()));
        let restores = Arc::new(RestorePipeline::new(&config, runner));

        let state = AppState::builder()
            .config(config.clone())
            .catalog(catalog)
            .backups(backups)
            .restores(restores)
            .build();

        let router = build_router(state)?;

        Ok(Self { router, config })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "mdbctl listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Shutdown complete");
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::test_utils::{StubRunner, test_app, test_config};
    use axum::http::StatusCode;
    use std::sync::Arc;

    #[tokio::test]
    async fn healthz_answers_without_touching_the_deployment() {
        let dir = tempfile::tempdir().unwrap();
        let server = test_app(test_config(dir.path()), Arc::new(StubRunner::new()));

        let response = server.get("/healthz").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.text(), "OK");
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let dir = tempfile::tempdir().unwrap();
        let server = test_app(test_config(dir.path()), Arc::new(StubRunner::new()));

        let response = server.get("/admin/docs").await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }
}
