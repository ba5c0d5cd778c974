use foodgram_api::{
    db::{create_pool, run_migrations},
    dto::auth::{LoginRequest, RegisterRequest, SetPasswordRequest},
    error::AppError,
    middleware::auth::{AuthUser, verify_token},
    services::user_service,
};

const SECRET: &str = "accounts-secret";

fn registration(email: &str, username: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.into(),
        username: username.into(),
        first_name: "Ada".into(),
        last_name: "Cook".into(),
        password: "s3cret-pass".into(),
    }
}

#[tokio::test]
async fn register_then_login_issues_a_token() -> anyhow::Result<()> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run account tests.");
            return Ok(());
        }
    };

    let pool = create_pool(&database_url).await?;
    run_migrations(&pool).await?;
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let email = format!("ada-{suffix}@example.com");
    let username = format!("ada-{suffix}");

    let user = user_service::register_user(&pool, registration(&email, &username))
        .await?
        .data
        .expect("user");
    assert_eq!(user.email, email);
    assert!(!user.is_subscribed);

    let err = user_service::register_user(&pool, registration(&email, "someone-else"))
        .await
        .expect_err("duplicate email");
    assert!(matches!(err, AppError::Conflict(_)));

    // Surrounding whitespace does not sneak a duplicate past the email check.
    let err = user_service::register_user(&pool, registration(&format!("  {email} "), "padded"))
        .await
        .expect_err("padded duplicate email");
    match err {
        AppError::Conflict(msg) => assert_eq!(msg, "A user with this email is already registered."),
        other => panic!("unexpected {other:?}"),
    }

    let err = user_service::register_user(&pool, registration("not-an-email", "x"))
        .await
        .expect_err("invalid email");
    assert!(matches!(err, AppError::Validation(_)));

    let token = user_service::login_user(
        &pool,
        SECRET,
        LoginRequest {
            email: email.clone(),
            password: "s3cret-pass".into(),
        },
    )
    .await?
    .data
    .expect("token")
    .auth_token;
    assert_eq!(verify_token(SECRET, &token)?.user_id, user.id);

    let err = user_service::login_user(
        &pool,
        SECRET,
        LoginRequest {
            email,
            password: "wrong".into(),
        },
    )
    .await
    .expect_err("bad password");
    assert!(matches!(err, AppError::BadRequest(_)));

    Ok(())
}

#[tokio::test]
async fn set_password_checks_the_current_one() -> anyhow::Result<()> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run account tests.");
            return Ok(());
        }
    };

    let pool = create_pool(&database_url).await?;
    run_migrations(&pool).await?;
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let email = format!("pw-{suffix}@example.com");
    let user = user_service::register_user(&pool, registration(&email, &format!("pw-{suffix}")))
        .await?
        .data
        .expect("user");
    let auth = AuthUser { user_id: user.id };

    let err = user_service::set_password(
        &pool,
        &auth,
        SetPasswordRequest {
            current_password: "wrong".into(),
            new_password: "brand-new-pass".into(),
        },
    )
    .await
    .expect_err("wrong current password");
    assert!(matches!(err, AppError::Validation(_)));

    user_service::set_password(
        &pool,
        &auth,
        SetPasswordRequest {
            current_password: "s3cret-pass".into(),
            new_password: "brand-new-pass".into(),
        },
    )
    .await?;

    let login = |password: &str| LoginRequest {
        email: email.clone(),
        password: password.into(),
    };
    let err = user_service::login_user(&pool, SECRET, login("s3cret-pass"))
        .await
        .expect_err("old password rejected");
    assert!(matches!(err, AppError::BadRequest(_)));
    let resp = user_service::login_user(&pool, SECRET, login("brand-new-pass")).await?;
    assert!(resp.data.is_some());

    Ok(())
}
