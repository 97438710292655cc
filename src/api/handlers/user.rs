use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::RegisterRequest;
use crate::api::extractors::{identity::AuthUser, json::ValidJson};
use crate::domain::models::user::{Role, User};
use crate::domain::services::auth_service::hash_password;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

const MIN_PASSWORD_LEN: usize = 8;

/// Self-service signup. New accounts always start as students.
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let username = payload.username.trim();
    let email = payload.email.trim().to_lowercase();

    if username.is_empty() || username.len() > 150 {
        return Err(AppError::Validation("username must be between 1 and 150 characters".into()));
    }
    if !looks_like_email(&email) {
        return Err(AppError::Validation("email must be a valid email address".into()));
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!("password must be at least {} characters", MIN_PASSWORD_LEN)));
    }

    if state.user_repo.find_by_username(username).await?.is_some() {
        return Err(AppError::Conflict("Username already exists".into()));
    }
    if state.user_repo.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = User::new(username.to_string(), email, password_hash, Role::Student);
    let created = state.user_repo.create(&user).await?;

    info!("Registered user: {}", created.id);

    Ok((StatusCode::CREATED, Json(created.summary())))
}

pub async fn me(AuthUser(user): AuthUser) -> impl IntoResponse {
    Json(user.summary())
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.'),
        None => false,
    }
}
