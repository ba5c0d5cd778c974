use sea_orm::{
    ColumnTrait, Condition,
    sea_query::{Expr, Query},
};

use crate::{
    entity::{RecipeTags, Tags, recipe_tags, recipes, tags},
    models::Ingredient,
    routes::params::RecipeQuery,
    services::viewer::Viewer,
};

/// Escapes LIKE wildcards so user input only ever matches literally.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Orders ingredients so that names starting with `query` come before names
/// that only contain it. Non-matching candidates are dropped and the input
/// order is kept inside each group. Comparison ignores case.
pub fn rank_by_name(candidates: Vec<Ingredient>, query: &str) -> Vec<Ingredient> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return candidates;
    }

    let (mut starts_with, contains): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .filter(|item| item.name.to_lowercase().contains(&needle))
        .partition(|item| item.name.to_lowercase().starts_with(&needle));

    starts_with.extend(contains);
    starts_with
}

/// Builds the recipe list condition. `None` means the result is known to be
/// empty: the requester asked for their favourites or cart and has none.
pub fn recipe_condition(query: &RecipeQuery, viewer: &Viewer) -> Option<Condition> {
    let mut condition = Condition::all();

    if let Some(author) = query.author {
        condition = condition.add(recipes::Column::AuthorId.eq(author));
    }

    if !query.tags.is_empty() {
        let tagged = Query::select()
            .column((RecipeTags, recipe_tags::Column::RecipeId))
            .from(RecipeTags)
            .inner_join(
                Tags,
                Expr::col((Tags, tags::Column::Id)).equals((RecipeTags, recipe_tags::Column::TagId)),
            )
            .and_where(Expr::col((Tags, tags::Column::Slug)).is_in(query.tags.clone()))
            .to_owned();
        condition = condition.add(recipes::Column::Id.in_subquery(tagged));
    }

    if viewer.is_authenticated() {
        if query.is_favorited {
            if viewer.favourites.is_empty() {
                return None;
            }
            condition = condition.add(recipes::Column::Id.is_in(viewer.favourites.iter().copied()));
        }
        if query.is_in_shopping_cart {
            if viewer.shopping_cart.is_empty() {
                return None;
            }
            condition =
                condition.add(recipes::Column::Id.is_in(viewer.shopping_cart.iter().copied()));
        }
    }

    Some(condition)
}
