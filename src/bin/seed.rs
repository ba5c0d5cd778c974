use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use foodgram_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
};
use serde::Deserialize;

const DEFAULT_SEED_PATH: &str = "data/seed.json";

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    tags: Vec<SeedTag>,
    #[serde(default)]
    ingredients: Vec<SeedIngredient>,
}

#[derive(Debug, Deserialize)]
struct SeedTag {
    name: String,
    color: String,
    slug: String,
}

#[derive(Debug, Deserialize)]
struct SeedIngredient {
    name: String,
    measurement_unit: String,
}

/// Usage: `seed [path/to/seed.json]`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SEED_PATH.to_string());
    let raw = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| anyhow::anyhow!("cannot read {path}: {e}"))?;
    let seed: SeedFile = serde_json::from_str(&raw)?;

    let tags = seed_tags(&pool, &seed.tags).await?;
    let ingredients = seed_ingredients(&pool, &seed.ingredients).await?;
    let user_id = ensure_user(&pool, "demo@example.com", "demo", "demo12345").await?;

    println!("Seed completed: {tags} tags, {ingredients} ingredients added. Demo user ID: {user_id}");
    Ok(())
}

async fn seed_tags(pool: &sqlx::PgPool, tags: &[SeedTag]) -> anyhow::Result<u64> {
    let mut added = 0;
    for tag in tags {
        let result = sqlx::query(
            r#"
            INSERT INTO tags (name, color, slug)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(&tag.name)
        .bind(&tag.color)
        .bind(&tag.slug)
        .execute(pool)
        .await?;
        added += result.rows_affected();
    }
    Ok(added)
}

async fn seed_ingredients(pool: &sqlx::PgPool, ingredients: &[SeedIngredient]) -> anyhow::Result<u64> {
    let mut added = 0;
    for ingredient in ingredients {
        let result = sqlx::query(
            r#"
            INSERT INTO ingredients (name, measurement_unit)
            VALUES ($1, $2)
            ON CONFLICT (name, measurement_unit) DO NOTHING
            "#,
        )
        .bind(&ingredient.name)
        .bind(&ingredient.measurement_unit)
        .execute(pool)
        .await?;
        added += result.rows_affected();
    }
    Ok(added)
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    username: &str,
    password: &str,
) -> anyhow::Result<i32> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(i32,)> = sqlx::query_as(
        r#"
        INSERT INTO users (email, username, first_name, last_name, password_hash)
        VALUES ($1, $2, 'Demo', 'Cook', $3)
        ON CONFLICT DO NOTHING
        RETURNING id
        "#,
    )
    .bind(email)
    .bind(username)
    .bind(password_hash)
    .fetch_optional(pool)
    .await?;

    // Already present from an earlier run.
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (i32,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email}");
    Ok(user_id)
}
