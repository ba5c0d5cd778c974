use std::sync::Arc;

use chrono::Utc;
use foodgram_api::{
    config::AppConfig,
    entity::{recipes, users},
    error::AppError,
    filters::recipe_condition,
    routes::params::RecipeQuery,
    serializers::{RecipeParts, recipe_from_parts, recipe_short_from_entity},
    services::{collection_service::Collection, viewer::Viewer},
};

fn config() -> Arc<AppConfig> {
    Arc::new(AppConfig {
        database_url: "postgres://localhost/foodgram".into(),
        host: "127.0.0.1".into(),
        port: 3000,
        jwt_secret: "secret".into(),
        media_root: "media".into(),
        media_url: "/media/".into(),
    })
}

fn recipe(id: i32, author_id: i32) -> recipes::Model {
    recipes::Model {
        id,
        author_id: Some(author_id),
        name: "Omelette".into(),
        image: "recipes/images/omelette.png".into(),
        text: "Whisk and fry.".into(),
        cooking_time: 10,
        created_at: Utc::now().into(),
    }
}

fn author(id: i32) -> users::Model {
    users::Model {
        id,
        email: "cook@example.com".into(),
        username: "cook".into(),
        first_name: "Ann".into(),
        last_name: "Cook".into(),
        password_hash: "x".into(),
        created_at: Utc::now().into(),
    }
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn anonymous_viewer_sees_all_flags_false() {
    let viewer = Viewer {
        user_id: None,
        favourites: [1].into_iter().collect(),
        shopping_cart: [1].into_iter().collect(),
        following: [7].into_iter().collect(),
    };
    let parts = RecipeParts {
        author: Some(author(7)),
        ..Default::default()
    };

    let recipe = recipe_from_parts(recipe(1, 7), parts, &viewer, &config());
    assert!(!recipe.is_favorited);
    assert!(!recipe.is_in_shopping_cart);
    assert!(!recipe.author.expect("author").is_subscribed);
}

#[test]
fn authenticated_viewer_flags_follow_membership() {
    let viewer = Viewer {
        user_id: Some(3),
        favourites: [1].into_iter().collect(),
        shopping_cart: Default::default(),
        following: [7].into_iter().collect(),
    };
    let parts = RecipeParts {
        author: Some(author(7)),
        ..Default::default()
    };

    let recipe = recipe_from_parts(recipe(1, 7), parts, &viewer, &config());
    assert!(recipe.is_favorited);
    assert!(!recipe.is_in_shopping_cart);
    assert!(recipe.author.expect("author").is_subscribed);
    assert_eq!(recipe.image, "/media/recipes/images/omelette.png");
}

#[test]
fn short_form_carries_image_url() {
    let short = recipe_short_from_entity(&recipe(4, 1), &config());
    assert_eq!(short.id, 4);
    assert_eq!(short.image, "/media/recipes/images/omelette.png");
    assert_eq!(short.cooking_time, 10);
}

#[test]
fn collection_messages_name_the_collection() {
    match Collection::ShoppingCart.already_present() {
        AppError::Conflict(msg) => assert_eq!(msg, "Already in the shopping cart."),
        other => panic!("unexpected {other:?}"),
    }
    match Collection::Favourites.not_present() {
        AppError::Conflict(msg) => assert_eq!(msg, "Not in favourites."),
        other => panic!("unexpected {other:?}"),
    }
    assert_ne!(
        Collection::ShoppingCart.membership_table(),
        Collection::Favourites.membership_table()
    );
}

#[test]
fn recipe_query_reads_repeated_tags_and_flags() {
    let query = RecipeQuery::from_pairs(pairs(&[
        ("tags", "breakfast"),
        ("tags", "lunch"),
        ("author", "5"),
        ("is_favorited", "1"),
        ("is_in_shopping_cart", "false"),
        ("limit", "3"),
        ("unknown", "ignored"),
    ]))
    .expect("query");

    assert_eq!(query.tags, vec!["breakfast", "lunch"]);
    assert_eq!(query.author, Some(5));
    assert!(query.is_favorited);
    assert!(!query.is_in_shopping_cart);
    assert_eq!(query.pagination().normalize(), (1, 3, 0));
}

#[test]
fn recipe_query_rejects_garbage() {
    assert!(matches!(
        RecipeQuery::from_pairs(pairs(&[("author", "abc")])),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        RecipeQuery::from_pairs(pairs(&[("is_favorited", "maybe")])),
        Err(AppError::Validation(_))
    ));
}

#[test]
fn default_page_size_is_six() {
    let query = RecipeQuery::from_pairs(pairs(&[("page", "3")])).expect("query");
    assert_eq!(query.pagination().normalize(), (3, 6, 12));
}

#[test]
fn huge_page_numbers_saturate_the_offset() {
    let query = RecipeQuery::from_pairs(pairs(&[("page", i64::MAX.to_string().as_str())])).expect("query");
    let (page, per_page, offset) = query.pagination().normalize();
    assert_eq!(page, i64::MAX);
    assert_eq!(per_page, 6);
    assert_eq!(offset, i64::MAX);
    assert!(offset >= 0);
}

#[test]
fn empty_favourites_short_circuit_the_listing() {
    let query = RecipeQuery {
        is_favorited: true,
        ..Default::default()
    };
    let viewer = Viewer {
        user_id: Some(1),
        ..Default::default()
    };
    assert!(recipe_condition(&query, &viewer).is_none());
}

#[test]
fn anonymous_collection_filters_are_ignored() {
    let query = RecipeQuery {
        is_favorited: true,
        is_in_shopping_cart: true,
        ..Default::default()
    };
    assert!(recipe_condition(&query, &Viewer::anonymous()).is_some());
}
