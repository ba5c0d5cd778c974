use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};

use crate::{
    dto::recipes::{RecipeList, RecipePayload},
    error::AppResult,
    middleware::auth::{AuthUser, MaybeUser, require_auth},
    models::{Recipe, RecipeShort},
    response::ApiResponse,
    routes::{
        extract::{ValidatedJson, ValidatedQuery},
        params::RecipeQuery,
    },
    services::{
        collection_service::{self, Collection},
        recipe_service,
        shopping_list_service::{self, SHOPPING_LIST_FILENAME},
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list_recipes))
        .route("/{id}", get(get_recipe));

    let authenticated = Router::new()
        .route("/", post(create_recipe))
        .route("/download_shopping_cart", get(download_shopping_cart))
        .route("/{id}", axum::routing::patch(update_recipe).delete(delete_recipe))
        .route("/{id}/favorite", post(add_favorite).delete(remove_favorite))
        .route(
            "/{id}/shopping_cart",
            post(add_to_shopping_cart).delete(remove_from_shopping_cart),
        )
        .route_layer(middleware::from_fn(require_auth));

    public.merge(authenticated)
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Items per page, default 6"),
        ("author" = Option<i32>, Query, description = "Author ID"),
        ("tags" = Option<Vec<String>>, Query, description = "Tag slugs, repeat the key for several; any match"),
        ("is_favorited" = Option<bool>, Query, description = "Only the requester's favourites"),
        ("is_in_shopping_cart" = Option<bool>, Query, description = "Only recipes in the requester's cart")
    ),
    responses(
        (status = 200, description = "List recipes, newest first", body = ApiResponse<RecipeList>),
        (status = 400, description = "Invalid filter value")
    ),
    tag = "Recipes"
)]
pub async fn list_recipes(
    State(state): State<AppState>,
    viewer: MaybeUser,
    ValidatedQuery(pairs): ValidatedQuery<Vec<(String, String)>>,
) -> AppResult<Json<ApiResponse<RecipeList>>> {
    let query = RecipeQuery::from_pairs(pairs)?;
    let resp = recipe_service::list_recipes(&state, viewer.user_id(), query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Get recipe", body = ApiResponse<Recipe>),
        (status = 404, description = "Recipe not found")
    ),
    tag = "Recipes"
)]
pub async fn get_recipe(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Recipe>>> {
    let resp = recipe_service::get_recipe(&state, viewer.user_id(), id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    request_body = RecipePayload,
    responses(
        (status = 201, description = "Recipe created", body = ApiResponse<Recipe>),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Recipes"
)]
pub async fn create_recipe(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<RecipePayload>,
) -> AppResult<(StatusCode, Json<ApiResponse<Recipe>>)> {
    let resp = recipe_service::create_recipe(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    patch,
    path = "/api/recipes/{id}",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    request_body = RecipePayload,
    responses(
        (status = 200, description = "Recipe replaced", body = ApiResponse<Recipe>),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Recipe not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Recipes"
)]
pub async fn update_recipe(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<RecipePayload>,
) -> AppResult<Json<ApiResponse<Recipe>>> {
    let resp = recipe_service::update_recipe(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe deleted", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Recipe not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Recipes"
)]
pub async fn delete_recipe(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = recipe_service::delete_recipe(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/favorite",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 201, description = "Added to favourites", body = ApiResponse<RecipeShort>),
        (status = 400, description = "Already in the favourites"),
        (status = 404, description = "Recipe not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Favourites"
)]
pub async fn add_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<(StatusCode, Json<ApiResponse<RecipeShort>>)> {
    let resp = collection_service::add_recipe(&state, &user, Collection::Favourites, id).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/favorite",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Removed from favourites", body = ApiResponse<serde_json::Value>),
        (status = 400, description = "Not in favourites"),
        (status = 404, description = "Recipe not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Favourites"
)]
pub async fn remove_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = collection_service::remove_recipe(&state, &user, Collection::Favourites, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/shopping_cart",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 201, description = "Added to shopping cart", body = ApiResponse<RecipeShort>),
        (status = 400, description = "Already in the shopping cart"),
        (status = 404, description = "Recipe not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Shopping cart"
)]
pub async fn add_to_shopping_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<(StatusCode, Json<ApiResponse<RecipeShort>>)> {
    let resp = collection_service::add_recipe(&state, &user, Collection::ShoppingCart, id).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/shopping_cart",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Removed from shopping cart", body = ApiResponse<serde_json::Value>),
        (status = 400, description = "Not in shopping cart"),
        (status = 404, description = "Recipe not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Shopping cart"
)]
pub async fn remove_from_shopping_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp =
        collection_service::remove_recipe(&state, &user, Collection::ShoppingCart, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/recipes/download_shopping_cart",
    responses(
        (status = 200, description = "Aggregated shopping list", content_type = "text/plain", body = String),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Shopping cart"
)]
pub async fn download_shopping_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let body = shopping_list_service::download_shopping_cart(&state.pool, &user).await?;
    let disposition = format!("attachment; filename=\"{SHOPPING_LIST_FILENAME}\"");
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
