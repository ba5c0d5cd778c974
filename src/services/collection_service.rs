use sea_orm::EntityTrait;

use crate::{
    audit,
    db::DbPool,
    entity::{Recipes, recipes::Model as RecipeModel},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::RecipeShort,
    response::{ApiResponse, Meta},
    serializers::recipe_short_from_entity,
    state::AppState,
};

/// The two per-user recipe collections. Both are a singleton container row
/// per user plus membership rows, created on first use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    ShoppingCart,
    Favourites,
}

impl Collection {
    pub fn display_name(self) -> &'static str {
        match self {
            Collection::ShoppingCart => "shopping cart",
            Collection::Favourites => "favourites",
        }
    }

    pub fn container_table(self) -> &'static str {
        match self {
            Collection::ShoppingCart => "shopping_carts",
            Collection::Favourites => "favourites",
        }
    }

    pub fn membership_table(self) -> &'static str {
        match self {
            Collection::ShoppingCart => "shopping_cart_recipes",
            Collection::Favourites => "favourite_recipes",
        }
    }

    fn container_column(self) -> &'static str {
        match self {
            Collection::ShoppingCart => "cart_id",
            Collection::Favourites => "favourite_id",
        }
    }

    fn audit_action(self, added: bool) -> &'static str {
        match (self, added) {
            (Collection::ShoppingCart, true) => "shopping_cart_add",
            (Collection::ShoppingCart, false) => "shopping_cart_remove",
            (Collection::Favourites, true) => "favourite_add",
            (Collection::Favourites, false) => "favourite_remove",
        }
    }

    pub fn already_present(self) -> AppError {
        AppError::conflict(format!("Already in the {}.", self.display_name()))
    }

    pub fn not_present(self) -> AppError {
        AppError::conflict(format!("Not in {}.", self.display_name()))
    }
}

pub async fn container_id(
    pool: &DbPool,
    collection: Collection,
    user_id: i32,
) -> AppResult<Option<i32>> {
    let sql = format!(
        "SELECT id FROM {} WHERE user_id = $1",
        collection.container_table()
    );
    let row: Option<(i32,)> = sqlx::query_as(&sql)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(id,)| id))
}

/// Returns the user's container, creating it if missing. Safe against two
/// requests creating it at once thanks to the unique `user_id`.
pub async fn ensure_container(pool: &DbPool, collection: Collection, user_id: i32) -> AppResult<i32> {
    let sql = format!(
        r#"
        INSERT INTO {} (user_id) VALUES ($1)
        ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
        RETURNING id
        "#,
        collection.container_table()
    );
    let (id,): (i32,) = sqlx::query_as(&sql).bind(user_id).fetch_one(pool).await?;
    Ok(id)
}

/// Recipe ids in the user's collection; `None` when the container was never
/// created.
pub async fn recipe_ids(
    pool: &DbPool,
    collection: Collection,
    user_id: i32,
) -> AppResult<Option<Vec<i32>>> {
    let Some(container) = container_id(pool, collection, user_id).await? else {
        return Ok(None);
    };
    let sql = format!(
        "SELECT recipe_id FROM {} WHERE {} = $1 ORDER BY recipe_id",
        collection.membership_table(),
        collection.container_column()
    );
    let rows: Vec<(i32,)> = sqlx::query_as(&sql)
        .bind(container)
        .fetch_all(pool)
        .await?;
    Ok(Some(rows.into_iter().map(|(id,)| id).collect()))
}

async fn contains(
    pool: &DbPool,
    collection: Collection,
    container: i32,
    recipe_id: i32,
) -> AppResult<bool> {
    let sql = format!(
        "SELECT EXISTS (SELECT 1 FROM {} WHERE {} = $1 AND recipe_id = $2)",
        collection.membership_table(),
        collection.container_column()
    );
    let (exists,): (bool,) = sqlx::query_as(&sql)
        .bind(container)
        .bind(recipe_id)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

async fn find_recipe(state: &AppState, recipe_id: i32) -> AppResult<RecipeModel> {
    Recipes::find_by_id(recipe_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

/// Adds a recipe to the collection. Adding twice is an error, not a no-op.
pub async fn add_recipe(
    state: &AppState,
    user: &AuthUser,
    collection: Collection,
    recipe_id: i32,
) -> AppResult<ApiResponse<RecipeShort>> {
    let recipe = find_recipe(state, recipe_id).await?;
    let container = ensure_container(&state.pool, collection, user.user_id).await?;

    if contains(&state.pool, collection, container, recipe.id).await? {
        return Err(collection.already_present());
    }

    let sql = format!(
        "INSERT INTO {} ({}, recipe_id) VALUES ($1, $2)",
        collection.membership_table(),
        collection.container_column()
    );
    sqlx::query(&sql)
        .bind(container)
        .bind(recipe.id)
        .execute(&state.pool)
        .await
        .map_err(|err| match AppError::from(err) {
            AppError::Conflict(_) => collection.already_present(),
            other => other,
        })?;

    tracing::info!(
        user_id = user.user_id,
        recipe_id = recipe.id,
        collection = collection.display_name(),
        "recipe added to collection"
    );
    audit::record(
        &state.pool,
        user.user_id,
        collection.audit_action(true),
        collection.membership_table(),
        serde_json::json!({ "recipe_id": recipe.id }),
    )
    .await;

    Ok(ApiResponse::success(
        format!("Added to {}", collection.display_name()),
        recipe_short_from_entity(&recipe, &state.config),
        Some(Meta::empty()),
    ))
}

pub async fn remove_recipe(
    state: &AppState,
    user: &AuthUser,
    collection: Collection,
    recipe_id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let recipe = find_recipe(state, recipe_id).await?;
    let container = ensure_container(&state.pool, collection, user.user_id).await?;

    let sql = format!(
        "DELETE FROM {} WHERE {} = $1 AND recipe_id = $2",
        collection.membership_table(),
        collection.container_column()
    );
    let result = sqlx::query(&sql)
        .bind(container)
        .bind(recipe.id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(collection.not_present());
    }

    audit::record(
        &state.pool,
        user.user_id,
        collection.audit_action(false),
        collection.membership_table(),
        serde_json::json!({ "recipe_id": recipe.id }),
    )
    .await;

    Ok(ApiResponse::empty(format!(
        "Removed from {}",
        collection.display_name()
    )))
}
