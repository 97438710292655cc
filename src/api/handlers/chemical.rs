use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::{identity::Identity, json::ValidJson};
use crate::domain::models::chemical::{ChemicalInput, ChemicalPatch};
use crate::domain::services::inventory_filter::ChemicalFilter;
use crate::domain::services::permissions::{authorize, Access};
use crate::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;

pub async fn list_chemicals(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    // Anonymous callers get 401 even when the query string is invalid.
    authorize(identity.user(), Access::Read)?;
    let filter = ChemicalFilter::from_params(&params)?;
    let chemicals = state.inventory.list_chemicals(identity.user(), &filter).await?;
    Ok(Json(chemicals))
}

pub async fn get_chemical(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let chemical = state.inventory.get_chemical(identity.user(), &id).await?;
    Ok(Json(chemical))
}

pub async fn create_chemical(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    payload: Result<ValidJson<ChemicalInput>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    authorize(identity.user(), Access::Write)?;
    let ValidJson(payload) = payload?;
    let created = state.inventory.create_chemical(identity.user(), payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn replace_chemical(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
    payload: Result<ValidJson<ChemicalInput>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    authorize(identity.user(), Access::Write)?;
    let ValidJson(payload) = payload?;
    let updated = state.inventory.replace_chemical(identity.user(), &id, payload).await?;
    Ok(Json(updated))
}

pub async fn patch_chemical(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
    payload: Result<ValidJson<ChemicalPatch>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    authorize(identity.user(), Access::Write)?;
    let ValidJson(payload) = payload?;
    let updated = state.inventory.patch_chemical(identity.user(), &id, payload).await?;
    Ok(Json(updated))
}

pub async fn delete_chemical(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.inventory.delete_chemical(identity.user(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
