use sea_orm::{EntityTrait, QueryOrder};

use crate::{
    entity::{Tags, tags::Column as TagCol},
    error::{AppError, AppResult},
    models::Tag,
    response::{ApiResponse, Meta},
    serializers::tag_from_entity,
    state::AppState,
};

pub async fn list_tags(state: &AppState) -> AppResult<ApiResponse<Vec<Tag>>> {
    let items: Vec<Tag> = Tags::find()
        .order_by_asc(TagCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(tag_from_entity)
        .collect();
    let total = items.len() as i64;
    Ok(ApiResponse::success("Tags", items, Some(Meta::new(1, total, total))))
}

pub async fn get_tag(state: &AppState, id: i32) -> AppResult<ApiResponse<Tag>> {
    let tag = Tags::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(tag_from_entity)
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Tag", tag, None))
}
