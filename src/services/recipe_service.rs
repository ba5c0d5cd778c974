use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;

use crate::{
    audit,
    dto::recipes::{IngredientAmount, RecipeList, RecipePayload},
    entity::{
        Ingredients, RecipeIngredients, RecipeTags, Recipes, Tags, Users,
        ingredients::Column as IngredientCol,
        recipe_ingredients::{ActiveModel as RecipeIngredientActive, Column as RecipeIngredientCol},
        recipe_tags::{ActiveModel as RecipeTagActive, Column as RecipeTagCol},
        recipes::{ActiveModel as RecipeActive, Column as RecipeCol, Model as RecipeModel},
        tags::Column as TagCol,
        users::Column as UserCol,
    },
    error::{AppError, AppResult},
    filters::recipe_condition,
    media::{self, DecodedImage},
    middleware::auth::{AuthUser, ensure_author},
    models::Recipe,
    response::{ApiResponse, Meta},
    routes::params::RecipeQuery,
    serializers::{RecipeParts, ingredient_line, recipe_from_parts, tag_from_entity},
    services::viewer::Viewer,
    state::AppState,
    validation::{first_missing, validate_recipe_payload},
};

pub async fn list_recipes(
    state: &AppState,
    user_id: Option<i32>,
    query: RecipeQuery,
) -> AppResult<ApiResponse<RecipeList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let viewer = Viewer::load(state, user_id).await?;

    let Some(condition) = recipe_condition(&query, &viewer) else {
        let meta = Meta::new(page, limit, 0);
        return Ok(ApiResponse::success(
            "Recipes",
            RecipeList { items: Vec::new() },
            Some(meta),
        ));
    };

    let finder = Recipes::find()
        .filter(condition)
        .order_by_desc(RecipeCol::Id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let models = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let items = represent(state, models, &viewer).await?;
    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Recipes", RecipeList { items }, Some(meta)))
}

pub async fn get_recipe(
    state: &AppState,
    user_id: Option<i32>,
    id: i32,
) -> AppResult<ApiResponse<Recipe>> {
    let model = find_recipe(state, id).await?;
    let viewer = Viewer::load(state, user_id).await?;
    let recipe = represent_one(state, model, &viewer).await?;
    Ok(ApiResponse::success("Recipe", recipe, None))
}

pub async fn create_recipe(
    state: &AppState,
    user: &AuthUser,
    payload: RecipePayload,
) -> AppResult<ApiResponse<Recipe>> {
    validate_recipe_payload(&payload)?;
    ensure_references_exist(state, &payload).await?;

    let encoded = payload
        .image
        .as_deref()
        .ok_or_else(|| AppError::validation("Image is required."))?;
    let image = media::decode_image(encoded)?;
    let image_path = media::save_image(&state.config.media_root, &image).await?;

    let created = insert_recipe(state, user, &payload, &image_path).await;
    let model = match created {
        Ok(model) => model,
        Err(err) => {
            media::remove_image(&state.config.media_root, &image_path).await;
            return Err(err);
        }
    };

    tracing::info!(user_id = user.user_id, recipe_id = model.id, "recipe created");
    audit::record(
        &state.pool,
        user.user_id,
        "recipe_create",
        "recipes",
        serde_json::json!({ "recipe_id": model.id }),
    )
    .await;

    let viewer = Viewer::load(state, Some(user.user_id)).await?;
    let recipe = represent_one(state, model, &viewer).await?;
    Ok(ApiResponse::success("Recipe created", recipe, Some(Meta::empty())))
}

async fn insert_recipe(
    state: &AppState,
    user: &AuthUser,
    payload: &RecipePayload,
    image_path: &str,
) -> AppResult<RecipeModel> {
    let txn = state.orm.begin().await?;

    let model = RecipeActive {
        id: NotSet,
        author_id: Set(Some(user.user_id)),
        name: Set(payload.name.trim().to_string()),
        image: Set(image_path.to_string()),
        text: Set(payload.text.clone()),
        cooking_time: Set(payload.cooking_time),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    attach_tags(&txn, model.id, &payload.tags).await?;
    attach_ingredients(&txn, model.id, &payload.ingredients).await?;

    txn.commit().await?;
    Ok(model)
}

/// Full replace: scalar fields are overwritten, the tag set is replaced and
/// every ingredient line is deleted and recreated from the payload.
pub async fn update_recipe(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: RecipePayload,
) -> AppResult<ApiResponse<Recipe>> {
    let existing = find_recipe(state, id).await?;
    ensure_author(user, existing.author_id)?;
    validate_recipe_payload(&payload)?;
    ensure_references_exist(state, &payload).await?;

    let new_image: Option<DecodedImage> = payload
        .image
        .as_deref()
        .map(media::decode_image)
        .transpose()?;
    let new_image_path = match &new_image {
        Some(image) => Some(media::save_image(&state.config.media_root, image).await?),
        None => None,
    };
    let old_image_path = existing.image.clone();

    let updated = replace_recipe(state, existing, &payload, new_image_path.as_deref()).await;
    let model = match updated {
        Ok(model) => model,
        Err(err) => {
            if let Some(path) = &new_image_path {
                media::remove_image(&state.config.media_root, path).await;
            }
            return Err(err);
        }
    };

    if new_image_path.is_some() {
        media::remove_image(&state.config.media_root, &old_image_path).await;
    }

    tracing::info!(user_id = user.user_id, recipe_id = model.id, "recipe updated");
    audit::record(
        &state.pool,
        user.user_id,
        "recipe_update",
        "recipes",
        serde_json::json!({ "recipe_id": model.id }),
    )
    .await;

    let viewer = Viewer::load(state, Some(user.user_id)).await?;
    let recipe = represent_one(state, model, &viewer).await?;
    Ok(ApiResponse::success("Updated", recipe, Some(Meta::empty())))
}

async fn replace_recipe(
    state: &AppState,
    existing: RecipeModel,
    payload: &RecipePayload,
    image_path: Option<&str>,
) -> AppResult<RecipeModel> {
    let txn = state.orm.begin().await?;

    let mut active: RecipeActive = existing.into();
    active.name = Set(payload.name.trim().to_string());
    active.text = Set(payload.text.clone());
    active.cooking_time = Set(payload.cooking_time);
    if let Some(path) = image_path {
        active.image = Set(path.to_string());
    }
    let model = active.update(&txn).await?;

    RecipeTags::delete_many()
        .filter(RecipeTagCol::RecipeId.eq(model.id))
        .exec(&txn)
        .await?;
    attach_tags(&txn, model.id, &payload.tags).await?;

    RecipeIngredients::delete_many()
        .filter(RecipeIngredientCol::RecipeId.eq(model.id))
        .exec(&txn)
        .await?;
    attach_ingredients(&txn, model.id, &payload.ingredients).await?;

    txn.commit().await?;
    Ok(model)
}

pub async fn delete_recipe(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let existing = find_recipe(state, id).await?;
    ensure_author(user, existing.author_id)?;

    // Ingredient lines, tag links and collection memberships cascade.
    let result = Recipes::delete_by_id(existing.id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    media::remove_image(&state.config.media_root, &existing.image).await;

    tracing::info!(user_id = user.user_id, recipe_id = id, "recipe deleted");
    audit::record(
        &state.pool,
        user.user_id,
        "recipe_delete",
        "recipes",
        serde_json::json!({ "recipe_id": id }),
    )
    .await;

    Ok(ApiResponse::empty("Deleted"))
}

async fn find_recipe(state: &AppState, id: i32) -> AppResult<RecipeModel> {
    Recipes::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

async fn attach_tags<C: ConnectionTrait>(conn: &C, recipe_id: i32, tags: &[i32]) -> AppResult<()> {
    let rows = tags.iter().map(|tag_id| RecipeTagActive {
        recipe_id: Set(recipe_id),
        tag_id: Set(*tag_id),
    });
    RecipeTags::insert_many(rows).exec_without_returning(conn).await?;
    Ok(())
}

async fn attach_ingredients<C: ConnectionTrait>(
    conn: &C,
    recipe_id: i32,
    ingredients: &[IngredientAmount],
) -> AppResult<()> {
    let rows = ingredients.iter().map(|item| RecipeIngredientActive {
        id: NotSet,
        recipe_id: Set(recipe_id),
        ingredient_id: Set(item.id),
        amount: Set(item.amount),
    });
    RecipeIngredients::insert_many(rows)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

async fn ensure_references_exist(state: &AppState, payload: &RecipePayload) -> AppResult<()> {
    let ingredient_ids: Vec<i32> = payload.ingredients.iter().map(|item| item.id).collect();
    let found: Vec<i32> = Ingredients::find()
        .select_only()
        .column(IngredientCol::Id)
        .filter(IngredientCol::Id.is_in(ingredient_ids.clone()))
        .into_tuple()
        .all(&state.orm)
        .await?;
    if let Some(missing) = first_missing(&ingredient_ids, &found) {
        return Err(AppError::validation(format!(
            "Ingredient with id {missing} does not exist."
        )));
    }

    let found: Vec<i32> = Tags::find()
        .select_only()
        .column(TagCol::Id)
        .filter(TagCol::Id.is_in(payload.tags.clone()))
        .into_tuple()
        .all(&state.orm)
        .await?;
    if let Some(missing) = first_missing(&payload.tags, &found) {
        return Err(AppError::validation(format!(
            "Tag with id {missing} does not exist."
        )));
    }

    Ok(())
}

async fn represent_one(state: &AppState, model: RecipeModel, viewer: &Viewer) -> AppResult<Recipe> {
    represent(state, vec![model], viewer)
        .await?
        .pop()
        .ok_or(AppError::NotFound)
}

/// Resolves tags, ingredient lines and authors for a page of recipes with one
/// query each, then maps every recipe for the given viewer.
async fn represent(
    state: &AppState,
    models: Vec<RecipeModel>,
    viewer: &Viewer,
) -> AppResult<Vec<Recipe>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = models.iter().map(|m| m.id).collect();

    let mut parts: HashMap<i32, RecipeParts> = HashMap::new();

    let tag_rows = RecipeTags::find()
        .filter(RecipeTagCol::RecipeId.is_in(ids.clone()))
        .order_by_asc(RecipeTagCol::TagId)
        .find_also_related(Tags)
        .all(&state.orm)
        .await?;
    for (link, tag) in tag_rows {
        if let Some(tag) = tag {
            parts
                .entry(link.recipe_id)
                .or_default()
                .tags
                .push(tag_from_entity(tag));
        }
    }

    let ingredient_rows = RecipeIngredients::find()
        .filter(RecipeIngredientCol::RecipeId.is_in(ids))
        .order_by_asc(RecipeIngredientCol::Id)
        .find_also_related(Ingredients)
        .all(&state.orm)
        .await?;
    for (line, ingredient) in ingredient_rows {
        if let Some(ingredient) = ingredient {
            parts
                .entry(line.recipe_id)
                .or_default()
                .ingredients
                .push(ingredient_line(line, ingredient));
        }
    }

    let author_ids: Vec<i32> = models.iter().filter_map(|m| m.author_id).collect();
    let authors: HashMap<i32, _> = Users::find()
        .filter(UserCol::Id.is_in(author_ids))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|user| (user.id, user))
        .collect();

    Ok(models
        .into_iter()
        .map(|model| {
            let mut recipe_parts = parts.remove(&model.id).unwrap_or_default();
            recipe_parts.author = model.author_id.and_then(|id| authors.get(&id).cloned());
            recipe_from_parts(model, recipe_parts, viewer, &state.config)
        })
        .collect())
}
