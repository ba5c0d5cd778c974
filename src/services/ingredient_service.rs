use sea_orm::{
    EntityTrait, QueryFilter, QueryOrder,
    sea_query::{Expr, extension::postgres::PgExpr},
};

use crate::{
    entity::{Ingredients, ingredients::Column},
    error::{AppError, AppResult},
    filters::{escape_like, rank_by_name},
    models::Ingredient,
    response::{ApiResponse, Meta},
    routes::params::IngredientQuery,
    serializers::ingredient_from_entity,
    state::AppState,
};

/// Ingredient search: prefix matches first, then substring matches.
pub async fn list_ingredients(
    state: &AppState,
    query: IngredientQuery,
) -> AppResult<ApiResponse<Vec<Ingredient>>> {
    let search = query
        .name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let mut finder = Ingredients::find().order_by_asc(Column::Id);
    if let Some(search) = search {
        let pattern = format!("%{}%", escape_like(search));
        finder = finder.filter(Expr::col(Column::Name).ilike(pattern));
    }

    let candidates = finder
        .all(&state.orm)
        .await?
        .into_iter()
        .map(ingredient_from_entity)
        .collect();

    let items = match search {
        Some(search) => rank_by_name(candidates, search),
        None => candidates,
    };
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Ingredients",
        items,
        Some(Meta::new(1, total, total)),
    ))
}

pub async fn get_ingredient(state: &AppState, id: i32) -> AppResult<ApiResponse<Ingredient>> {
    let ingredient = Ingredients::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(ingredient_from_entity)
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Ingredient", ingredient, None))
}
