use axum::{Json, Router, extract::State, http::StatusCode, middleware, routing::post};

use crate::{
    dto::auth::{LoginRequest, LoginResponse},
    error::AppResult,
    middleware::auth::{AuthUser, require_auth},
    response::ApiResponse,
    routes::extract::ValidatedJson,
    services::user_service::login_user,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    let authenticated = Router::new()
        .route("/token/logout", post(logout))
        .route_layer(middleware::from_fn(require_auth));

    Router::new()
        .route("/token/login", post(login))
        .merge(authenticated)
}

#[utoipa::path(
    post,
    path = "/api/auth/token/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Issue an access token", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let resp = login_user(&state.pool, &state.config.jwt_secret, payload).await?;
    Ok(Json(resp))
}

/// Tokens are stateless JWTs: nothing is revoked server-side, the client
/// drops its token and it lapses at expiry.
#[utoipa::path(
    post,
    path = "/api/auth/token/logout",
    responses(
        (status = 204, description = "Logged out"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn logout(user: AuthUser) -> StatusCode {
    tracing::info!(user_id = user.user_id, "logged out");
    StatusCode::NO_CONTENT
}
