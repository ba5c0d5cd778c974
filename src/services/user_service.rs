use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;
use sea_orm::{EntityTrait, PaginatorTrait, QueryOrder, QuerySelect};
use sqlx::FromRow;

use crate::{
    audit,
    db::DbPool,
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest, SetPasswordRequest},
        users::UserList,
    },
    entity::{Users, users::Column as UserCol},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, issue_token},
    models::User,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    serializers::user_from_entity,
    services::viewer::Viewer,
    state::AppState,
};

#[derive(Debug, FromRow)]
struct Account {
    id: i32,
    email: String,
    username: String,
    first_name: String,
    last_name: String,
    password_hash: String,
}

impl Account {
    fn into_user(self) -> User {
        User {
            email: self.email,
            id: self.id,
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            is_subscribed: false,
        }
    }
}

fn require(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field}: this field is required.")));
    }
    Ok(())
}

pub async fn register_user(pool: &DbPool, payload: RegisterRequest) -> AppResult<ApiResponse<User>> {
    let RegisterRequest {
        email,
        username,
        first_name,
        last_name,
        password,
    } = payload;

    require("email", &email)?;
    require("username", &username)?;
    require("first_name", &first_name)?;
    require("last_name", &last_name)?;
    require("password", &password)?;
    let email = email.trim();
    let username = username.trim();
    if !email.contains('@') {
        return Err(AppError::validation("email: enter a valid email address."));
    }

    let email_taken: Option<(i32,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    if email_taken.is_some() {
        return Err(AppError::conflict("A user with this email is already registered."));
    }

    let username_taken: Option<(i32,)> = sqlx::query_as("SELECT id FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    if username_taken.is_some() {
        return Err(AppError::conflict("A user with this username already exists."));
    }

    let password_hash = hash_password(&password)?;

    let account: Account = sqlx::query_as(
        r#"
        INSERT INTO users (email, username, first_name, last_name, password_hash)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, email, username, first_name, last_name, password_hash
        "#,
    )
    .bind(email)
    .bind(username)
    .bind(first_name.trim())
    .bind(last_name.trim())
    .bind(password_hash)
    .fetch_one(pool)
    .await?;

    audit::record(
        pool,
        account.id,
        "user_register",
        "users",
        serde_json::json!({ "user_id": account.id }),
    )
    .await;

    Ok(ApiResponse::success("User created", account.into_user(), None))
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

fn password_matches(stored_hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub async fn login_user(
    pool: &DbPool,
    jwt_secret: &str,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;
    let account: Option<Account> = sqlx::query_as(
        "SELECT id, email, username, first_name, last_name, password_hash FROM users WHERE email = $1",
    )
    .bind(email.trim())
    .fetch_optional(pool)
    .await?;

    let account = match account {
        Some(a) => a,
        None => return Err(AppError::BadRequest("Invalid email or password".into())),
    };

    if !password_matches(&account.password_hash, &password)? {
        return Err(AppError::BadRequest("Invalid email or password".into()));
    }

    let token = issue_token(jwt_secret, account.id)?;

    audit::record(
        pool,
        account.id,
        "user_login",
        "users",
        serde_json::json!({ "user_id": account.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse { auth_token: token },
        Some(Meta::empty()),
    ))
}

/// Replaces the password after checking the current one. Tokens already
/// issued stay valid until they expire.
pub async fn set_password(
    pool: &DbPool,
    user: &AuthUser,
    payload: SetPasswordRequest,
) -> AppResult<()> {
    let SetPasswordRequest {
        current_password,
        new_password,
    } = payload;
    require("current_password", &current_password)?;
    require("new_password", &new_password)?;

    let stored: Option<(String,)> = sqlx::query_as("SELECT password_hash FROM users WHERE id = $1")
        .bind(user.user_id)
        .fetch_optional(pool)
        .await?;
    let (stored_hash,) = stored.ok_or(AppError::Unauthorized)?;

    if !password_matches(&stored_hash, &current_password)? {
        return Err(AppError::validation("current_password: invalid password."));
    }

    sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
        .bind(hash_password(&new_password)?)
        .bind(user.user_id)
        .execute(pool)
        .await?;

    tracing::info!(user_id = user.user_id, "password changed");
    audit::record(
        pool,
        user.user_id,
        "user_set_password",
        "users",
        serde_json::json!({ "user_id": user.user_id }),
    )
    .await;

    Ok(())
}

pub async fn me(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<User>> {
    let model = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::Unauthorized)?;
    Ok(ApiResponse::success(
        "Current user",
        user_from_entity(&model, &Viewer::anonymous()),
        None,
    ))
}

pub async fn list_users(
    state: &AppState,
    user_id: Option<i32>,
    pagination: Pagination,
) -> AppResult<ApiResponse<UserList>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = Users::find().order_by_asc(UserCol::Id);
    let total = finder.clone().count(&state.orm).await? as i64;
    let models = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let viewer = Viewer::load(state, user_id).await?;
    let items = models
        .iter()
        .map(|model| user_from_entity(model, &viewer))
        .collect();
    Ok(ApiResponse::success(
        "Users",
        UserList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_user(
    state: &AppState,
    user_id: Option<i32>,
    id: i32,
) -> AppResult<ApiResponse<User>> {
    let model = Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let viewer = Viewer::load(state, user_id).await?;
    Ok(ApiResponse::success(
        "User",
        user_from_entity(&model, &viewer),
        None,
    ))
}
