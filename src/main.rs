use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use vendor_lookup::data::GameData;
use vendor_lookup::{BuildState, ServerConfig, VendorLookup};

const DEFAULT_CONFIG_PATH: &str = "vendor-lookup.toml";

// ============================================================================
// App State
// ============================================================================

#[derive(Clone)]
struct AppState {
    lookup: VendorLookup,
}

// ============================================================================
// HTTP Handlers
// ============================================================================

async fn health_check() -> &'static str {
    "OK"
}

#[derive(Serialize)]
struct StatusResponse {
    state: BuildState,
    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    located_npcs: Option<usize>,
}

async fn build_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let index = state.lookup.index();
    Json(StatusResponse {
        state: state.lookup.state(),
        items: index.map(|index| index.item_count()),
        located_npcs: index.map(|index| index.location_count()),
    })
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

fn not_ready() -> Response {
    error_response(StatusCode::SERVICE_UNAVAILABLE, "vendor index is still building")
}

async fn get_item(State(state): State<AppState>, Path(item_id): Path<u32>) -> Response {
    let Some(index) = state.lookup.index() else {
        return not_ready();
    };

    match index.item(item_id) {
        Some(item) => Json(item).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "no vendor sells this item"),
    }
}

async fn get_npc_location(State(state): State<AppState>, Path(npc_id): Path<u32>) -> Response {
    let Some(index) = state.lookup.index() else {
        return not_ready();
    };

    match index.npc_location(npc_id) {
        Some(location) => Json(location).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "NPC has no known location"),
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vendor_lookup=info".parse().expect("static directive")),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = match ServerConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    let options = match config.build_options() {
        Ok(options) => options,
        Err(e) => {
            error!("Failed to load lookup tables: {}", e);
            std::process::exit(1);
        }
    };

    let data = match GameData::load_from_directory(&config.data_dir) {
        Ok(data) => data,
        Err(e) => {
            error!("Failed to load game data from {:?}: {}", config.data_dir, e);
            std::process::exit(1);
        }
    };

    let lookup = VendorLookup::spawn(Arc::new(data.records), Arc::new(data.layers), options);
    let state = AppState { lookup };

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/status", get(build_status))
        .route("/items/:item_id", get(get_item))
        .route("/npcs/:npc_id/location", get(get_npc_location))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([axum::http::Method::GET, axum::http::Method::OPTIONS]),
        )
        .with_state(state);

    let listener = match tokio::net::TcpListener::bind(config.bind).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", config.bind, e);
            std::process::exit(1);
        }
    };
    info!("Vendor lookup server listening on http://{}", config.bind);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
    }
}
