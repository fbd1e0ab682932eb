// rest/routes/auth.rs — signup, login, current user.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::auth::{password, token};
use crate::error::ApiError;
use crate::rest::auth::AuthUser;
use crate::users::{PublicUser, Role, UserRow};
use crate::AppContext;

const MIN_PASSWORD_LEN: usize = 6;

// Fields are optional so an absent field reports the same 400 as a blank one
// instead of a serde-level rejection.
#[derive(Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Body returned by both signup and login.
#[derive(Serialize)]
pub struct AuthResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub token: String,
}

fn auth_response(ctx: &AppContext, user: UserRow) -> AuthResponse {
    let token = token::issue(
        &ctx.token_secret,
        &user.id,
        user.role,
        ctx.config.token_ttl_hours,
    );
    AuthResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
        token,
    }
}

pub async fn signup(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let name = body.name.as_deref().unwrap_or("").trim().to_string();
    let email = body.email.as_deref().unwrap_or("").trim().to_lowercase();
    let password = body.password.unwrap_or_default();
    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(ApiError::bad_request("Please provide all fields"));
    }
    if !email.contains('@') {
        return Err(ApiError::bad_request("Please provide a valid email"));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(
            "Password must be at least 6 characters",
        ));
    }

    if ctx.storage.find_user_by_email(&email).await?.is_some() {
        return Err(ApiError::bad_request("User already exists"));
    }

    let role = body.role.unwrap_or(Role::Buyer);
    let hash = password::hash(&password)?;
    let user = ctx.storage.create_user(&name, &email, &hash, role).await?;
    info!("user signed up: {} ({})", user.id, user.role.as_str());

    Ok((StatusCode::CREATED, Json(auth_response(&ctx, user))))
}

pub async fn login(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = body.email.as_deref().unwrap_or("").trim().to_lowercase();
    let password = body.password.unwrap_or_default();
    if email.is_empty() || password.is_empty() {
        return Err(ApiError::bad_request("Please provide email and password"));
    }

    let user = ctx.storage.find_user_by_email(&email).await?;
    match user {
        Some(user) if password::verify(&password, &user.password_hash) => {
            Ok(Json(auth_response(&ctx, user)))
        }
        _ => Err(ApiError::unauthorized("Invalid email or password")),
    }
}

pub async fn me(AuthUser(user): AuthUser) -> Json<PublicUser> {
    Json(user.into())
}
