use std::collections::HashSet;

use crate::{
    dto::recipes::RecipePayload,
    error::{AppError, AppResult},
};

pub const MAX_NAME_LENGTH: usize = 200;

/// Checks a recipe payload and reports the first rule it breaks.
pub fn validate_recipe_payload(payload: &RecipePayload) -> AppResult<()> {
    if payload.ingredients.is_empty() {
        return Err(AppError::validation("Add at least one ingredient."));
    }
    if payload.ingredients.iter().any(|item| item.amount <= 0) {
        return Err(AppError::validation(
            "Ingredient amount must be greater than 0.",
        ));
    }
    if has_duplicates(payload.ingredients.iter().map(|item| item.id)) {
        return Err(AppError::validation("Ingredients must not repeat."));
    }
    if payload.tags.is_empty() {
        return Err(AppError::validation("Add at least one tag."));
    }
    if has_duplicates(payload.tags.iter().copied()) {
        return Err(AppError::validation("Tags must not repeat."));
    }
    if payload.cooking_time <= 0 {
        return Err(AppError::validation(
            "Cooking time must be at least 1 minute.",
        ));
    }
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Recipe name must not be empty."));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::validation(format!(
            "Recipe name must be at most {MAX_NAME_LENGTH} characters."
        )));
    }
    Ok(())
}

fn has_duplicates(ids: impl Iterator<Item = i32>) -> bool {
    let mut seen = HashSet::new();
    ids.into_iter().any(|id| !seen.insert(id))
}

/// First id of `requested` that is absent from `existing`, in request order.
pub fn first_missing(requested: &[i32], existing: &[i32]) -> Option<i32> {
    let existing: HashSet<i32> = existing.iter().copied().collect();
    requested.iter().copied().find(|id| !existing.contains(id))
}
