use axum::{Json, Router, http::StatusCode, http::Uri, middleware, routing::get};
use tower_http::services::ServeDir;

use crate::{
    middleware::auth::authenticate,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub mod auth;
pub mod doc;
pub mod extract;
pub mod health;
pub mod ingredients;
pub mod params;
pub mod recipes;
pub mod tags;
pub mod users;

// The API router resolves the requester once for every route; sub-routers
// add `require_auth` where a logged-in user is needed.
pub fn create_api_router(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/tags", tags::router())
        .nest("/ingredients", ingredients::router())
        .nest("/recipes", recipes::router())
        .nest("/users", users::router())
        .nest("/auth", auth::router())
        .layer(middleware::from_fn_with_state(state, authenticate))
}

/// Full application without the transport layers added in `main`.
pub fn create_app(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", create_api_router(state.clone()))
        .merge(doc::scalar_docs());

    let media_prefix = state.config.media_url.trim_end_matches('/').to_string();
    if media_prefix.starts_with('/') && media_prefix.len() > 1 {
        app = app.nest_service(&media_prefix, ServeDir::new(&state.config.media_root));
    }

    app.fallback(not_found).with_state(state)
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    let body = ApiResponse::success(
        "Not Found",
        serde_json::json!({ "path": uri.path() }),
        Some(Meta::empty()),
    );
    (StatusCode::NOT_FOUND, Json(body))
}
