use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Recipe;

/// One `{id, amount}` entry of a recipe payload.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct IngredientAmount {
    pub id: i32,
    pub amount: i32,
}

/// Body of recipe create and update requests.
///
/// `image` is a base64 data URI (`data:image/png;base64,...`). It is required
/// when creating and keeps the stored image when omitted on update.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RecipePayload {
    #[serde(default)]
    pub ingredients: Vec<IngredientAmount>,
    #[serde(default)]
    pub tags: Vec<i32>,
    pub image: Option<String>,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct RecipeList {
    #[schema(value_type = Vec<Recipe>)]
    pub items: Vec<Recipe>,
}
