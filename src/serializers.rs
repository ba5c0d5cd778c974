//! Mapping from stored entities to the JSON representations of the API.
//!
//! Everything here is pure: the requester-dependent flags come from a
//! [`Viewer`] loaded beforehand, and image paths are turned into URLs through
//! the configured media prefix.

use crate::{
    config::AppConfig,
    entity::{ingredients, recipe_ingredients, recipes, tags, users},
    models::{Ingredient, Recipe, RecipeIngredient, RecipeShort, Tag, User},
    services::viewer::Viewer,
};

pub fn tag_from_entity(model: tags::Model) -> Tag {
    Tag {
        id: model.id,
        name: model.name,
        color: model.color,
        slug: model.slug,
    }
}

pub fn ingredient_from_entity(model: ingredients::Model) -> Ingredient {
    Ingredient {
        id: model.id,
        name: model.name,
        measurement_unit: model.measurement_unit,
    }
}

pub fn user_from_entity(model: &users::Model, viewer: &Viewer) -> User {
    User {
        email: model.email.clone(),
        id: model.id,
        username: model.username.clone(),
        first_name: model.first_name.clone(),
        last_name: model.last_name.clone(),
        is_subscribed: viewer.is_subscribed(model.id),
    }
}

pub fn ingredient_line(
    line: recipe_ingredients::Model,
    ingredient: ingredients::Model,
) -> RecipeIngredient {
    RecipeIngredient {
        id: ingredient.id,
        name: ingredient.name,
        measurement_unit: ingredient.measurement_unit,
        amount: line.amount,
    }
}

pub fn recipe_short_from_entity(model: &recipes::Model, config: &AppConfig) -> RecipeShort {
    RecipeShort {
        id: model.id,
        name: model.name.clone(),
        image: config.media_url_for(&model.image),
        cooking_time: model.cooking_time,
    }
}

/// Related rows of one recipe, already resolved.
#[derive(Debug, Default)]
pub struct RecipeParts {
    pub tags: Vec<Tag>,
    pub ingredients: Vec<RecipeIngredient>,
    pub author: Option<users::Model>,
}

pub fn recipe_from_parts(
    model: recipes::Model,
    parts: RecipeParts,
    viewer: &Viewer,
    config: &AppConfig,
) -> Recipe {
    Recipe {
        id: model.id,
        tags: parts.tags,
        author: parts.author.as_ref().map(|author| user_from_entity(author, viewer)),
        ingredients: parts.ingredients,
        is_favorited: viewer.is_favorited(model.id),
        is_in_shopping_cart: viewer.is_in_shopping_cart(model.id),
        image: config.media_url_for(&model.image),
        name: model.name,
        text: model.text,
        cooking_time: model.cooking_time,
    }
}
