//! menugate REST API Server
//!
//! Run with: cargo run --features server --bin menugate-server
//!
//! Endpoints:
//!   GET    /status              - Store status
//!   GET    /menus               - Assignable menu catalog
//!   GET    /permissions         - Full role -> menus map
//!   GET    /permissions/:role   - One role's menus
//!   PUT    /permissions/:role   - Overwrite one role's menus
//!   DELETE /permissions/:role   - Remove one role's entry
//!   POST   /routes              - Route table for a role set
//!   POST   /check               - Explain one node's decision

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use menugate::{
    resolve, Decision, LmdbBackend, MenuCatalog, MenuGateError, MenuKey, Navigator, PermissionMap,
    RoleSet, RouteNode, RouteTable, Settings,
};

// ============================================================================
// State
// ============================================================================

type AppState = Arc<Navigator<LmdbBackend>>;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
struct SetMenusReq {
    menus: Vec<String>,
}

#[derive(Deserialize)]
struct RoutesReq {
    roles: RoleSet,
}

#[derive(Deserialize)]
struct CheckReq {
    roles: RoleSet,
    name: Option<String>,
    #[serde(default)]
    path: String,
}

#[derive(Serialize)]
struct StatusRes {
    initialized: bool,
    roles: usize,
    super_role: String,
}

#[derive(Serialize)]
struct CheckRes {
    allowed: bool,
    key: Option<MenuKey>,
    decision: Decision,
}

#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(msg.into()) }
    }
}

fn status_of(e: &MenuGateError) -> StatusCode {
    match e {
        MenuGateError::UnknownMenuKey(_) | MenuGateError::InvalidRole(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn get_status(State(nav): State<AppState>) -> (StatusCode, Json<ApiResponse<StatusRes>>) {
    match nav.store().is_initialized() {
        Ok(initialized) => {
            let roles = if initialized { nav.store().load().len() } else { 0 };
            let res = StatusRes { initialized, roles, super_role: nav.policy().super_role.to_string() };
            (StatusCode::OK, Json(ApiResponse::ok(res)))
        }
        Err(e) => (status_of(&e), Json(ApiResponse::err(e.to_string()))),
    }
}

async fn get_menus(State(nav): State<AppState>) -> Json<ApiResponse<MenuCatalog>> {
    Json(ApiResponse::ok(nav.catalog().clone()))
}

async fn get_permissions(State(nav): State<AppState>) -> Json<ApiResponse<PermissionMap>> {
    Json(ApiResponse::ok(nav.store().all_permissions()))
}

async fn get_role_permissions(
    State(nav): State<AppState>,
    Path(role): Path<String>,
) -> Json<ApiResponse<BTreeSet<MenuKey>>> {
    Json(ApiResponse::ok(nav.store().get_permissions(&role)))
}

async fn put_role_permissions(
    State(nav): State<AppState>,
    Path(role): Path<String>,
    Json(req): Json<SetMenusReq>,
) -> (StatusCode, Json<ApiResponse<String>>) {
    match nav.set_menu_permissions(&role, &req.menus) {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::ok("updated".into()))),
        Err(e) => (status_of(&e), Json(ApiResponse::err(e.to_string()))),
    }
}

async fn delete_role_permissions(
    State(nav): State<AppState>,
    Path(role): Path<String>,
) -> (StatusCode, Json<ApiResponse<bool>>) {
    match nav.store().remove_role(&role) {
        Ok(removed) => (StatusCode::OK, Json(ApiResponse::ok(removed))),
        Err(e) => (status_of(&e), Json(ApiResponse::err(e.to_string()))),
    }
}

async fn post_routes(
    State(nav): State<AppState>,
    Json(req): Json<RoutesReq>,
) -> Json<ApiResponse<RouteTable>> {
    Json(ApiResponse::ok(nav.generate_routes(&req.roles)))
}

async fn post_check(
    State(nav): State<AppState>,
    Json(req): Json<CheckReq>,
) -> Json<ApiResponse<CheckRes>> {
    let mut node = RouteNode::new(req.path);
    node.name = req.name;
    let decision = nav.explain(&req.roles, &node);
    Json(ApiResponse::ok(CheckRes { allowed: decision.is_allowed(), key: resolve(&node), decision }))
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> menugate::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(env_filter).init();

    let config_path = std::env::var("MENUGATE_CONFIG").unwrap_or_else(|_| "menugate.toml".into());
    let settings = Settings::load(&config_path)?;
    info!(?settings, "loaded configuration");

    let backend = LmdbBackend::open(&settings.storage.path)?;
    let nav: AppState = Arc::new(Navigator::with_policy(
        backend,
        settings.policy.clone(),
        MenuCatalog::standard(),
    ));
    // Seed on startup rather than on first request
    nav.store().load();

    // CORS for the console dev server
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/status", get(get_status))
        .route("/menus", get(get_menus))
        .route("/permissions", get(get_permissions))
        .route(
            "/permissions/:role",
            get(get_role_permissions)
                .put(put_role_permissions)
                .delete(delete_role_permissions),
        )
        .route("/routes", post(post_routes))
        .route("/check", post(post_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(nav);

    let addr = settings.bind_addr();
    info!(%addr, "menugate server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
