use foodgram_api::{filters::{escape_like, rank_by_name}, models::Ingredient};

fn ingredient(id: i32, name: &str) -> Ingredient {
    Ingredient {
        id,
        name: name.to_string(),
        measurement_unit: "g".to_string(),
    }
}

fn names(items: &[Ingredient]) -> Vec<&str> {
    items.iter().map(|i| i.name.as_str()).collect()
}

#[test]
fn prefix_matches_come_before_substring_matches() {
    let candidates = vec![
        ingredient(1, "sea salt"),
        ingredient(2, "salt"),
        ingredient(3, "sugar"),
        ingredient(4, "Salted butter"),
    ];

    let ranked = rank_by_name(candidates, "sal");
    assert_eq!(names(&ranked), vec!["salt", "Salted butter", "sea salt"]);
}

#[test]
fn ranking_keeps_input_order_within_groups() {
    let candidates = vec![
        ingredient(1, "rock salt"),
        ingredient(2, "salt flakes"),
        ingredient(3, "sea salt"),
        ingredient(4, "salt"),
    ];

    let ranked = rank_by_name(candidates, "SALT");
    assert_eq!(
        names(&ranked),
        vec!["salt flakes", "salt", "rock salt", "sea salt"]
    );
}

#[test]
fn empty_query_returns_candidates_unchanged() {
    let candidates = vec![ingredient(2, "milk"), ingredient(1, "eggs")];
    let ranked = rank_by_name(candidates.clone(), "  ");
    assert_eq!(ranked, candidates);
}

#[test]
fn non_matching_candidates_are_dropped() {
    let ranked = rank_by_name(vec![ingredient(1, "flour"), ingredient(2, "sugar")], "salt");
    assert!(ranked.is_empty());
}

#[test]
fn like_wildcards_are_escaped() {
    assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    assert_eq!(escape_like("salt"), "salt");
}

#[test]
fn surrounding_spaces_in_the_query_are_ignored() {
    let candidates = vec![ingredient(1, "sea salt"), ingredient(2, "salt")];
    let ranked = rank_by_name(candidates, "  salt ");
    assert_eq!(names(&ranked), vec!["salt", "sea salt"]);
}
