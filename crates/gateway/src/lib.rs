//! HTTP API gateway for DAVE.
//!
//! Exposes a health check and the v1 chat API. Each browser tab (or any
//! other client) is a session identified by the `X-Session-Id` header.
//!
//! Built on Axum.

pub mod api_v1;
pub mod sessions;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::{Router, response::Json, routing::get};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use dave_assistant::PonderDelay;
use dave_config::AppConfig;
use dave_core::storage::KeyValueStore;
use dave_knowledge::KnowledgeBase;

use crate::sessions::{SessionRegistry, SessionSettings};

/// Request bodies are short questions; anything bigger is refused.
const BODY_LIMIT_BYTES: usize = 64 * 1024;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub config: AppConfig,
    pub sessions: SessionRegistry,
}

pub type SharedState = Arc<GatewayState>;

impl GatewayState {
    /// Open the configured store and knowledge table.
    pub fn from_config(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let store = open_store(&config)?;
        let knowledge = Arc::new(load_knowledge(&config)?);
        let settings = SessionSettings {
            limits: config.limits.to_store_limits(),
            ponder: PonderDelay::new(config.assistant.ponder_base(), config.assistant.ponder_jitter()),
            suggestion_count: config.assistant.suggestion_count,
        };

        Ok(Self {
            sessions: SessionRegistry::new(store, knowledge, settings),
            config,
        })
    }
}

/// The store named by `storage.backend`.
pub fn open_store(config: &AppConfig) -> Result<Arc<dyn KeyValueStore>, Box<dyn std::error::Error>> {
    let backend = config.storage.backend.as_str();
    dave_storage::build_store(backend, config.storage.resolved_dir())
        .ok_or_else(|| format!("unknown storage backend '{backend}'").into())
}

/// The knowledge table from `knowledge.path`, or the builtin one.
pub fn load_knowledge(config: &AppConfig) -> Result<KnowledgeBase, Box<dyn std::error::Error>> {
    match &config.knowledge.path {
        Some(path) => {
            let kb = KnowledgeBase::from_json_file(path)?;
            info!(path = %path.display(), entries = kb.entries().len(), "Knowledge table loaded");
            Ok(kb)
        }
        None => Ok(KnowledgeBase::builtin()),
    }
}

/// Build the full router: health check plus the v1 API.
///
/// Layers applied:
/// - CORS limited to `gateway.allowed_origins`
/// - Request body size limit (64 KB)
/// - HTTP trace logging
pub fn build_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.config.gateway.allowed_origins);

    Router::new()
        .route("/health", get(health_handler))
        .nest("/v1", api_v1::v1_router(state))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let session_header = HeaderName::from_static(api_v1::SESSION_HEADER);
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, session_header.clone()])
        .expose_headers([session_header])
        .max_age(std::time::Duration::from_secs(3600))
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let state = Arc::new(GatewayState::from_config(config)?);
    info!(
        store = state.sessions.store().name(),
        entries = state.sessions.knowledge().entries().len(),
        "Gateway state ready"
    );

    let app = build_router(state);

    info!(addr = %addr, "Gateway starting with v1 API");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
