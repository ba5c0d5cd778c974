use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

pub const DEFAULT_PAGE_SIZE: i64 = 6;

#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    #[serde(alias = "limit")]
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 100);
        let offset = (page - 1).saturating_mul(per_page);
        (page, per_page, offset)
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct IngredientQuery {
    pub name: Option<String>,
}

// Flattening `Pagination` here would break number parsing in query strings.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SubscriptionQuery {
    pub page: Option<i64>,
    #[serde(alias = "limit")]
    pub per_page: Option<i64>,
    pub recipes_limit: Option<u64>,
}

impl SubscriptionQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Recipe list filters. Built from raw query pairs because `tags` repeats.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecipeQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub author: Option<i32>,
    pub tags: Vec<String>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

impl RecipeQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> AppResult<Self> {
        let mut query = RecipeQuery::default();
        for (key, value) in pairs {
            match key.as_str() {
                "page" => query.page = Some(parse_number(&key, &value)?),
                "limit" | "per_page" => query.per_page = Some(parse_number(&key, &value)?),
                "author" => query.author = Some(parse_number(&key, &value)?),
                "tags" => {
                    if !value.is_empty() {
                        query.tags.push(value);
                    }
                }
                "is_favorited" => query.is_favorited = parse_flag(&key, &value)?,
                "is_in_shopping_cart" => query.is_in_shopping_cart = parse_flag(&key, &value)?,
                _ => {}
            }
        }
        Ok(query)
    }

    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> AppResult<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| AppError::validation(format!("{key}: enter a whole number.")))
}

fn parse_flag(key: &str, value: &str) -> AppResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" | "" => Ok(false),
        _ => Err(AppError::validation(format!("{key}: enter a valid boolean."))),
    }
}
