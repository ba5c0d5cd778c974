use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    error::AppResult,
    models::Ingredient,
    response::ApiResponse,
    routes::{extract::ValidatedQuery, params::IngredientQuery},
    services::ingredient_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_ingredients))
        .route("/{id}", get(get_ingredient))
}

#[utoipa::path(
    get,
    path = "/api/ingredients",
    params(
        ("name" = Option<String>, Query, description = "Search by name; prefix matches are listed first")
    ),
    responses(
        (status = 200, description = "Ingredients ranked by name match", body = ApiResponse<Vec<Ingredient>>)
    ),
    tag = "Ingredients"
)]
pub async fn list_ingredients(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<IngredientQuery>,
) -> AppResult<Json<ApiResponse<Vec<Ingredient>>>> {
    let resp = ingredient_service::list_ingredients(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/ingredients/{id}",
    params(
        ("id" = i32, Path, description = "Ingredient ID")
    ),
    responses(
        (status = 200, description = "Get ingredient", body = ApiResponse<Ingredient>),
        (status = 404, description = "Ingredient not found")
    ),
    tag = "Ingredients"
)]
pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Ingredient>>> {
    let resp = ingredient_service::get_ingredient(&state, id).await?;
    Ok(Json(resp))
}
