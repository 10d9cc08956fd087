use crate::{
    auth::{
        hash_password, issue_token, verify_password, AuthResponse, AuthSettings, LoginRequest,
        RegisterRequest,
    },
    error::AppError,
    models::UserCredentials,
};
use actix_web::{post, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

/// Register a new user
///
/// Creates a new user account. The email must not already be registered;
/// the comparison is a case-sensitive exact match on the stored value.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    settings: web::Data<AuthSettings>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    // Validate input
    register_data.validate()?;

    // Check if email already exists
    let existing: Option<(i32,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(&register_data.email)
        .fetch_optional(&**pool)
        .await?;

    if existing.is_some() {
        return Err(AppError::AlreadyExists("Email already registered".into()));
    }

    // Hash password at the configured cost
    let password_hash = hash_password(&register_data.password, settings.bcrypt_cost)?;

    // Insert new user; a failure here propagates as a persistence error
    sqlx::query("INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3)")
        .bind(&register_data.username)
        .bind(&register_data.email)
        .bind(&password_hash)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::Created().json(json!({ "message": "user created" })))
}

/// Login user
///
/// Authenticates a user and returns a signed token embedding the user's
/// identity, valid for the configured window. An unknown email and a wrong
/// password fail differently: 404 versus 401.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    settings: web::Data<AuthSettings>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    // Validate input
    login_data.validate()?;

    // Get user from database
    let user: Option<UserCredentials> = sqlx::query_as(
        "SELECT id, username, email, password_hash FROM users WHERE email = $1",
    )
    .bind(&login_data.email)
    .fetch_optional(&**pool)
    .await?;

    let user = match user {
        Some(user) => user,
        None => return Err(AppError::NotFound("User does not exist".into())),
    };

    // Verify password
    if !verify_password(&login_data.password, &user.password_hash)? {
        return Err(AppError::InvalidCredentials("Incorrect password".into()));
    }

    let issued = issue_token(user.id, &user.username, &user.email, &settings.token)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        token: issued.token,
        expires_at: issued.expires_at,
    }))
}
