use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{
    requests::{RecaptchaRequest, SendCodeRequest, VerifyCodeRequest},
    responses::DetailResponse,
};
use crate::api::extractors::json::ValidJson;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn send_code(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<SendCodeRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.email.trim().is_empty() {
        return Err(AppError::Validation("Email is required".into()));
    }

    state.verification.send_code(&payload.email).await?;
    Ok(Json(DetailResponse::new("Verification code sent")))
}

pub async fn verify_code(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<VerifyCodeRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.email.trim().is_empty() || payload.code.trim().is_empty() {
        return Err(AppError::Validation("Email and code are required".into()));
    }

    state.verification.verify_code(&payload.email, &payload.code).await?;
    Ok(Json(DetailResponse::new("Email verified")))
}

pub async fn verify_recaptcha(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<RecaptchaRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.token.trim().is_empty() {
        return Err(AppError::Validation("reCAPTCHA token is required".into()));
    }

    if !state.captcha.verify(&payload.token).await? {
        info!("reCAPTCHA verification failed");
        return Err(AppError::Validation("reCAPTCHA verification failed".into()));
    }

    Ok(Json(DetailResponse::new("reCAPTCHA verified")))
}
