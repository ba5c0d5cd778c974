use foodgram_api::{
    dto::recipes::{IngredientAmount, RecipePayload},
    error::AppError,
    validation::{MAX_NAME_LENGTH, first_missing, validate_recipe_payload},
};

fn payload() -> RecipePayload {
    RecipePayload {
        ingredients: vec![
            IngredientAmount { id: 1, amount: 10 },
            IngredientAmount { id: 2, amount: 5 },
        ],
        tags: vec![1, 2],
        image: None,
        name: "Pancakes".into(),
        text: "Mix and fry.".into(),
        cooking_time: 20,
    }
}

fn message(result: Result<(), AppError>) -> String {
    match result {
        Err(AppError::Validation(msg)) => msg,
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn valid_payload_passes() {
    assert!(validate_recipe_payload(&payload()).is_ok());
}

#[test]
fn duplicate_ingredients_are_rejected() {
    let mut p = payload();
    p.ingredients = vec![
        IngredientAmount { id: 1, amount: 10 },
        IngredientAmount { id: 1, amount: 5 },
    ];
    assert_eq!(message(validate_recipe_payload(&p)), "Ingredients must not repeat.");
}

#[test]
fn empty_collections_are_rejected() {
    let mut p = payload();
    p.ingredients.clear();
    assert_eq!(message(validate_recipe_payload(&p)), "Add at least one ingredient.");

    let mut p = payload();
    p.tags.clear();
    assert_eq!(message(validate_recipe_payload(&p)), "Add at least one tag.");
}

#[test]
fn duplicate_tags_are_rejected() {
    let mut p = payload();
    p.tags = vec![3, 3];
    assert_eq!(message(validate_recipe_payload(&p)), "Tags must not repeat.");
}

#[test]
fn amounts_and_cooking_time_must_be_positive() {
    let mut p = payload();
    p.ingredients[1].amount = 0;
    assert_eq!(
        message(validate_recipe_payload(&p)),
        "Ingredient amount must be greater than 0."
    );

    let mut p = payload();
    p.cooking_time = 0;
    assert_eq!(
        message(validate_recipe_payload(&p)),
        "Cooking time must be at least 1 minute."
    );
}

#[test]
fn first_broken_rule_is_reported() {
    // Empty tags, zero cooking time and duplicate ingredients all at once.
    let mut p = payload();
    p.ingredients = vec![
        IngredientAmount { id: 4, amount: 1 },
        IngredientAmount { id: 4, amount: 2 },
    ];
    p.tags.clear();
    p.cooking_time = 0;
    assert_eq!(message(validate_recipe_payload(&p)), "Ingredients must not repeat.");
}

#[test]
fn name_must_be_present_and_bounded() {
    let mut p = payload();
    p.name = "   ".into();
    assert!(matches!(validate_recipe_payload(&p), Err(AppError::Validation(_))));

    let mut p = payload();
    p.name = "a".repeat(MAX_NAME_LENGTH);
    assert!(validate_recipe_payload(&p).is_ok());

    p.name.push('a');
    assert!(matches!(validate_recipe_payload(&p), Err(AppError::Validation(_))));
}

#[test]
fn first_missing_reports_in_request_order() {
    assert_eq!(first_missing(&[3, 1, 7, 9], &[1, 3]), Some(7));
    assert_eq!(first_missing(&[1, 2], &[2, 1, 5]), None);
    assert_eq!(first_missing(&[], &[]), None);
}
