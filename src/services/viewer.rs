use std::collections::HashSet;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QuerySelect};

use crate::{
    entity::{Follows, follows::Column as FollowCol},
    error::AppResult,
    services::collection_service::{self, Collection},
    state::AppState,
};

/// Everything about the requester that recipe and user representations
/// depend on, loaded once per request. Anonymous requesters get empty sets, so
/// every derived flag is false for them.
#[derive(Debug, Clone, Default)]
pub struct Viewer {
    pub user_id: Option<i32>,
    pub favourites: HashSet<i32>,
    pub shopping_cart: HashSet<i32>,
    pub following: HashSet<i32>,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub async fn load(state: &AppState, user_id: Option<i32>) -> AppResult<Self> {
        let Some(user_id) = user_id else {
            return Ok(Self::anonymous());
        };

        let favourites =
            collection_service::recipe_ids(&state.pool, Collection::Favourites, user_id)
                .await?
                .unwrap_or_default();
        let shopping_cart =
            collection_service::recipe_ids(&state.pool, Collection::ShoppingCart, user_id)
                .await?
                .unwrap_or_default();

        let following: Vec<i32> = Follows::find()
            .select_only()
            .column(FollowCol::AuthorId)
            .filter(FollowCol::UserId.eq(user_id))
            .into_tuple()
            .all(&state.orm)
            .await?;

        Ok(Self {
            user_id: Some(user_id),
            favourites: favourites.into_iter().collect(),
            shopping_cart: shopping_cart.into_iter().collect(),
            following: following.into_iter().collect(),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn is_favorited(&self, recipe_id: i32) -> bool {
        self.is_authenticated() && self.favourites.contains(&recipe_id)
    }

    pub fn is_in_shopping_cart(&self, recipe_id: i32) -> bool {
        self.is_authenticated() && self.shopping_cart.contains(&recipe_id)
    }

    pub fn is_subscribed(&self, author_id: i32) -> bool {
        self.is_authenticated() && self.following.contains(&author_id)
    }
}
