use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{requests::ChatbotRequest, responses::ChatbotResponse};
use crate::api::extractors::{identity::Identity, json::ValidJson};
use crate::domain::models::user::Role;
use crate::domain::services::permissions::{authorize, Access};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn ask(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    ValidJson(payload): ValidJson<ChatbotRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = authorize(identity.user(), Access::Chatbot)?;

    let query = payload.query.trim();
    if query.is_empty() {
        return Err(AppError::Validation("Query is required".into()));
    }

    let answer = state.llm_service.complete(&build_prompt(user.role, query)).await?;

    info!(user_id = %user.id, "Chatbot answered query");

    Ok(Json(ChatbotResponse { answer }))
}

fn build_prompt(role: Role, query: &str) -> String {
    format!(
        "You are a helpful assistant for a high school science lab chemical inventory system. \
         The user role is {}. Answer the query accordingly.\nUser query: {}",
        role, query
    )
}
