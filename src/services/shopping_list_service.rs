use std::collections::BTreeMap;

use sqlx::FromRow;

use crate::{db::DbPool, error::AppResult, middleware::auth::AuthUser};

pub const SHOPPING_LIST_FILENAME: &str = "shopping_list.txt";

/// One ingredient line of a recipe in the cart, before aggregation.
#[derive(Debug, Clone, FromRow)]
pub struct CartIngredientRow {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListLine {
    pub name: String,
    pub measurement_unit: String,
    pub total: i64,
}

/// Sums amounts per (name, unit) and returns the groups sorted by name.
pub fn aggregate(rows: impl IntoIterator<Item = CartIngredientRow>) -> Vec<ShoppingListLine> {
    let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
    for row in rows {
        *totals.entry((row.name, row.measurement_unit)).or_insert(0) += i64::from(row.amount);
    }
    totals
        .into_iter()
        .map(|((name, measurement_unit), total)| ShoppingListLine {
            name,
            measurement_unit,
            total,
        })
        .collect()
}

pub fn render(lines: &[ShoppingListLine]) -> String {
    lines
        .iter()
        .map(|line| {
            format!(
                "{} — {} {}\r\n",
                line.name, line.total, line.measurement_unit
            )
        })
        .collect()
}

/// Text file with the summed ingredients of every recipe in the user's cart.
/// A user without a cart gets an empty file.
pub async fn download_shopping_cart(pool: &DbPool, user: &AuthUser) -> AppResult<String> {
    let rows = sqlx::query_as::<_, CartIngredientRow>(
        r#"
        SELECT i.name, i.measurement_unit, ri.amount
        FROM shopping_carts sc
        JOIN shopping_cart_recipes scr ON scr.cart_id = sc.id
        JOIN recipe_ingredients ri ON ri.recipe_id = scr.recipe_id
        JOIN ingredients i ON i.id = ri.ingredient_id
        WHERE sc.user_id = $1
        "#,
    )
    .bind(user.user_id)
    .fetch_all(pool)
    .await?;

    let lines = aggregate(rows);
    tracing::debug!(user_id = user.user_id, lines = lines.len(), "shopping list built");
    Ok(render(&lines))
}
