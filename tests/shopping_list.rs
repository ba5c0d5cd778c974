use foodgram_api::services::shopping_list_service::{CartIngredientRow, aggregate, render};

fn row(name: &str, unit: &str, amount: i32) -> CartIngredientRow {
    CartIngredientRow {
        name: name.into(),
        measurement_unit: unit.into(),
        amount,
    }
}

#[test]
fn amounts_of_the_same_ingredient_are_summed() {
    let lines = aggregate(vec![row("Salt", "g", 10), row("Salt", "g", 5)]);
    assert_eq!(render(&lines), "Salt — 15 g\r\n");
}

#[test]
fn lines_are_sorted_by_name_and_split_by_unit() {
    let lines = aggregate(vec![
        row("sugar", "g", 100),
        row("milk", "ml", 200),
        row("eggs", "pcs", 2),
        row("milk", "cup", 1),
        row("eggs", "pcs", 3),
    ]);

    assert_eq!(
        render(&lines),
        "eggs — 5 pcs\r\nmilk — 1 cup\r\nmilk — 200 ml\r\nsugar — 100 g\r\n"
    );
}

#[test]
fn empty_cart_renders_empty_file() {
    assert_eq!(render(&aggregate(Vec::new())), "");
}
