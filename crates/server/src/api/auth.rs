//! Registration, login and token verification handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use faregate_core::{hash_password, verify_password, CreateUserRequest};

use crate::state::AppState;

use super::error::ApiError;
use super::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: String,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    if body.username.is_empty() || body.password.is_empty() || body.email.is_empty() {
        return Err(ApiError::Validation("Missing required fields".to_string()));
    }

    let user = state.users().create(CreateUserRequest {
        username: body.username,
        email: body.email,
        password_hash: hash_password(&body.password),
    })?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user_id: user.id,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: String,
    pub username: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginBody>,
) -> Result<Json<LoginResponse>, ApiError> {
    if body.username.is_empty() || body.password.is_empty() {
        return Err(ApiError::Validation("Missing credentials".to_string()));
    }

    // A missing user and a wrong password are indistinguishable to the
    // caller.
    let user = state
        .users()
        .find_by_username(&body.username)?
        .filter(|user| verify_password(&user.password_hash, &body.password))
        .ok_or_else(|| ApiError::Unauthenticated("Invalid credentials".to_string()))?;

    let token = state.auth().issue(&user);

    Ok(Json(LoginResponse {
        token,
        user_id: user.id,
        username: user.username,
    }))
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub user_id: String,
}

pub async fn verify(AuthUser(claims): AuthUser) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        valid: true,
        user_id: claims.user_id,
    })
}
