use axum::{body::Bytes, extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::{LoginRequest, RefreshRequest, VerifyTokenRequest};
use crate::api::dtos::responses::DetailResponse;
use crate::api::extractors::{identity::ACCESS_COOKIE, json::ValidJson};
use crate::domain::models::{auth::{AuthResponse, TokenPair}, user::User};
use crate::domain::services::auth_service::{verify_dummy_password, verify_password, ACCESS_TOKEN_MINUTES, REFRESH_TOKEN_DAYS};
use std::sync::Arc;
use serde_json::json;
use tower_cookies::{Cookies, Cookie};
use tower_cookies::cookie::SameSite;
use time::Duration;
use tracing::{info, warn};

const REFRESH_COOKIE: &str = "refresh_token";

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let Some(user) = state.user_repo.find_by_username(payload.username.trim()).await? else {
        verify_dummy_password(&payload.password);
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "Login rejected: wrong password");
        return Err(AppError::InvalidCredentials);
    }
    if !user.is_active {
        warn!(user_id = %user.id, "Login rejected: inactive account");
        return Err(AppError::InvalidCredentials);
    }

    let tokens = state.auth_service.login(&user).await?;
    set_cookies(&cookies, &tokens, state.config.auth_cookie_secure);

    info!("User logged in: {}", user.id);

    Ok(Json(auth_response(tokens, &user)))
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let raw_token = presented_refresh_token(&cookies, &body)?
        .ok_or(AppError::Unauthorized)?;

    let user_id = state.auth_service.refresh_token_owner(&raw_token).await?;
    let user = state.user_repo.find_by_id(&user_id).await?
        .filter(|u| u.is_active)
        .ok_or(AppError::Unauthorized)?;

    let tokens = state.auth_service.refresh(&raw_token, &user).await?;
    set_cookies(&cookies, &tokens, state.config.auth_cookie_secure);

    info!("Token refreshed for user: {}", user.id);

    Ok(Json(auth_response(tokens, &user)))
}

pub async fn verify(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<VerifyTokenRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.auth_service.decode_access_token(&payload.token)?;
    Ok(Json(json!({})))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let raw_token = presented_refresh_token(&cookies, &body)?;

    if let Some(raw_token) = raw_token
        && let Err(e) = state.auth_service.logout(&raw_token).await
    {
        warn!("Failed to revoke refresh token on logout: {}", e);
    }

    cookies.remove(Cookie::build((ACCESS_COOKIE, "")).path("/").into());
    cookies.remove(Cookie::build((REFRESH_COOKIE, "")).path("/").into());

    info!("User logged out");

    Ok(Json(DetailResponse::new("Logged out")))
}

/// The refresh token from an optional `{"refresh": ...}` body, falling back to the cookie.
fn presented_refresh_token(cookies: &Cookies, body: &[u8]) -> Result<Option<String>, AppError> {
    let from_body = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        serde_json::from_slice::<RefreshRequest>(body)
            .map_err(|e| AppError::Validation(format!("Malformed JSON body: {}", e)))?
            .refresh
    };

    Ok(from_body
        .filter(|t| !t.is_empty())
        .or_else(|| cookies.get(REFRESH_COOKIE).map(|c| c.value().to_string())))
}

fn auth_response(tokens: TokenPair, user: &User) -> AuthResponse {
    AuthResponse {
        access: tokens.access,
        refresh: tokens.refresh,
        user: user.summary(),
    }
}

fn set_cookies(cookies: &Cookies, tokens: &TokenPair, secure: bool) {
    let mut access_c = Cookie::new(ACCESS_COOKIE, tokens.access.clone());
    access_c.set_http_only(true);
    access_c.set_secure(secure);
    access_c.set_same_site(SameSite::Strict);
    access_c.set_path("/");
    access_c.set_max_age(Duration::minutes(ACCESS_TOKEN_MINUTES));
    cookies.add(access_c);

    let mut refresh_c = Cookie::new(REFRESH_COOKIE, tokens.refresh.clone());
    refresh_c.set_http_only(true);
    refresh_c.set_secure(secure);
    refresh_c.set_same_site(SameSite::Strict);
    refresh_c.set_path("/");
    refresh_c.set_max_age(Duration::days(REFRESH_TOKEN_DAYS));
    cookies.add(refresh_c);
}
