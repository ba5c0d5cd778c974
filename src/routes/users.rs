use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
};

use crate::{
    dto::{
        auth::{RegisterRequest, SetPasswordRequest},
        users::{SubscriptionList, UserList},
    },
    error::AppResult,
    middleware::auth::{AuthUser, MaybeUser, require_auth},
    models::{Subscription, User},
    response::ApiResponse,
    routes::{
        extract::{ValidatedJson, ValidatedQuery},
        params::{Pagination, SubscriptionQuery},
    },
    services::{follow_service, user_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list_users).post(register))
        .route("/{id}", get(get_user));

    let authenticated = Router::new()
        .route("/me", get(me))
        .route("/set_password", post(set_password))
        .route("/subscriptions", get(subscriptions))
        .route("/{id}/subscribe", post(subscribe).delete(unsubscribe))
        .route_layer(middleware::from_fn(require_auth));

    public.merge(authenticated)
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Register user", body = ApiResponse<User>),
        (status = 400, description = "Invalid or duplicate data")
    ),
    tag = "Users"
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    let resp = user_service::register_user(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/users",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Items per page, default 6")
    ),
    responses(
        (status = 200, description = "List users", body = ApiResponse<UserList>)
    ),
    tag = "Users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    viewer: MaybeUser,
    ValidatedQuery(pagination): ValidatedQuery<Pagination>,
) -> AppResult<Json<ApiResponse<UserList>>> {
    let resp = user_service::list_users(&state, viewer.user_id(), pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Get user", body = ApiResponse<User>),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = user_service::get_user(&state, viewer.user_id(), id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<User>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = user_service::me(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/users/set_password",
    request_body = SetPasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Current password is wrong or a field is empty"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn set_password(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<SetPasswordRequest>,
) -> AppResult<StatusCode> {
    user_service::set_password(&state.pool, &user, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/users/subscriptions",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Items per page, default 6"),
        ("recipes_limit" = Option<u64>, Query, description = "Max recipes listed per author")
    ),
    responses(
        (status = 200, description = "Followed authors", body = ApiResponse<SubscriptionList>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Subscriptions"
)]
pub async fn subscriptions(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedQuery(query): ValidatedQuery<SubscriptionQuery>,
) -> AppResult<Json<ApiResponse<SubscriptionList>>> {
    let resp = follow_service::list_subscriptions(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/subscribe",
    params(
        ("id" = i32, Path, description = "Author ID"),
        ("recipes_limit" = Option<u64>, Query, description = "Max recipes listed")
    ),
    responses(
        (status = 201, description = "Subscribed", body = ApiResponse<Subscription>),
        (status = 400, description = "Self-subscription or already subscribed"),
        (status = 404, description = "Author not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Subscriptions"
)]
pub async fn subscribe(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    ValidatedQuery(query): ValidatedQuery<SubscriptionQuery>,
) -> AppResult<(StatusCode, Json<ApiResponse<Subscription>>)> {
    let resp = follow_service::subscribe(&state, &user, id, query.recipes_limit).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}/subscribe",
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Unsubscribed", body = ApiResponse<serde_json::Value>),
        (status = 400, description = "Not following this author"),
        (status = 404, description = "Author not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Subscriptions"
)]
pub async fn unsubscribe(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = follow_service::unsubscribe(&state, &user, id).await?;
    Ok(Json(resp))
}
