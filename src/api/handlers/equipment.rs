use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::{identity::Identity, json::ValidJson};
use crate::domain::models::equipment::{EquipmentInput, EquipmentPatch};
use crate::domain::services::inventory_filter::EquipmentFilter;
use crate::domain::services::permissions::{authorize, Access};
use crate::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;

pub async fn list_equipment(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    // Anonymous callers get 401 even when the query string is invalid.
    authorize(identity.user(), Access::Read)?;
    let filter = EquipmentFilter::from_params(&params)?;
    let equipment = state.inventory.list_equipment(identity.user(), &filter).await?;
    Ok(Json(equipment))
}

pub async fn get_equipment(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let equipment = state.inventory.get_equipment(identity.user(), &id).await?;
    Ok(Json(equipment))
}

pub async fn create_equipment(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    payload: Result<ValidJson<EquipmentInput>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    authorize(identity.user(), Access::Write)?;
    let ValidJson(payload) = payload?;
    let created = state.inventory.create_equipment(identity.user(), payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn replace_equipment(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
    payload: Result<ValidJson<EquipmentInput>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    authorize(identity.user(), Access::Write)?;
    let ValidJson(payload) = payload?;
    let updated = state.inventory.replace_equipment(identity.user(), &id, payload).await?;
    Ok(Json(updated))
}

pub async fn patch_equipment(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
    payload: Result<ValidJson<EquipmentPatch>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    authorize(identity.user(), Access::Write)?;
    let ValidJson(payload) = payload?;
    let updated = state.inventory.patch_equipment(identity.user(), &id, payload).await?;
    Ok(Json(updated))
}

pub async fn delete_equipment(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.inventory.delete_equipment(identity.user(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
