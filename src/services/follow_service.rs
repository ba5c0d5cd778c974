use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
    sea_query::{Expr, Query},
};
use sea_orm::ActiveValue::NotSet;

use crate::{
    audit,
    dto::users::SubscriptionList,
    entity::{
        Follows, Recipes, Users,
        follows::{ActiveModel as FollowActive, Column as FollowCol},
        recipes::Column as RecipeCol,
        users::{Column as UserCol, Model as UserModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Subscription,
    response::{ApiResponse, Meta},
    routes::params::SubscriptionQuery,
    serializers::{recipe_short_from_entity, user_from_entity},
    services::viewer::Viewer,
    state::AppState,
};

pub async fn subscribe(
    state: &AppState,
    user: &AuthUser,
    author_id: i32,
    recipes_limit: Option<u64>,
) -> AppResult<ApiResponse<Subscription>> {
    let author = find_user(state, author_id).await?;
    if author.id == user.user_id {
        return Err(AppError::conflict("Can't follow self."));
    }

    // The unique (user, author) pair decides duplicates, also under races.
    FollowActive {
        id: NotSet,
        user_id: Set(user.user_id),
        author_id: Set(author.id),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await
    .map_err(|err| match AppError::from(err) {
        AppError::Conflict(_) => AppError::conflict("Already subscribed to this user."),
        other => other,
    })?;

    tracing::info!(user_id = user.user_id, author_id = author.id, "subscribed");
    audit::record(
        &state.pool,
        user.user_id,
        "subscribe",
        "follows",
        serde_json::json!({ "author_id": author.id }),
    )
    .await;

    let viewer = Viewer::load(state, Some(user.user_id)).await?;
    let subscription = build_subscription(state, &author, &viewer, recipes_limit).await?;
    Ok(ApiResponse::success(
        "Subscribed",
        subscription,
        Some(Meta::empty()),
    ))
}

pub async fn unsubscribe(
    state: &AppState,
    user: &AuthUser,
    author_id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let author = find_user(state, author_id).await?;

    let result = Follows::delete_many()
        .filter(
            Condition::all()
                .add(FollowCol::UserId.eq(user.user_id))
                .add(FollowCol::AuthorId.eq(author.id)),
        )
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::conflict("Not following this author."));
    }

    tracing::info!(user_id = user.user_id, author_id = author.id, "unsubscribed");
    audit::record(
        &state.pool,
        user.user_id,
        "unsubscribe",
        "follows",
        serde_json::json!({ "author_id": author.id }),
    )
    .await;

    Ok(ApiResponse::empty("Unsubscribed"))
}

pub async fn list_subscriptions(
    state: &AppState,
    user: &AuthUser,
    query: SubscriptionQuery,
) -> AppResult<ApiResponse<SubscriptionList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let followed = Query::select()
        .column(FollowCol::AuthorId)
        .from(Follows)
        .and_where(Expr::col(FollowCol::UserId).eq(user.user_id))
        .to_owned();

    let finder = Users::find()
        .filter(UserCol::Id.in_subquery(followed))
        .order_by_asc(UserCol::Id);

    let total = finder.clone().count(&state.orm).await? as i64;
    let authors = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let viewer = Viewer::load(state, Some(user.user_id)).await?;
    let mut items = Vec::with_capacity(authors.len());
    for author in &authors {
        items.push(build_subscription(state, author, &viewer, query.recipes_limit).await?);
    }

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Subscriptions",
        SubscriptionList { items },
        Some(meta),
    ))
}

async fn find_user(state: &AppState, id: i32) -> AppResult<UserModel> {
    Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

/// Author card with their newest recipes (all of them unless limited).
async fn build_subscription(
    state: &AppState,
    author: &UserModel,
    viewer: &Viewer,
    recipes_limit: Option<u64>,
) -> AppResult<Subscription> {
    let authored = Recipes::find()
        .filter(RecipeCol::AuthorId.eq(author.id))
        .order_by_desc(RecipeCol::Id);

    let recipes_count = authored.clone().count(&state.orm).await? as i64;
    let recipes = authored
        .limit(recipes_limit)
        .all(&state.orm)
        .await?
        .iter()
        .map(|recipe| recipe_short_from_entity(recipe, &state.config))
        .collect();

    Ok(Subscription {
        user: user_from_entity(author, viewer),
        recipes,
        recipes_count,
    })
}
