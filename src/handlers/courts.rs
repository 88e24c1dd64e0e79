use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use super::require_admin;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Court, CourtPayload};
use crate::state::AppState;

// GET /courts
#[derive(Debug, Deserialize)]
pub struct CourtsQuery {
    pub sport: Option<String>,
}

pub async fn list_courts(
    State(state): State<Arc<AppState>>,
    query: Result<Query<CourtsQuery>, QueryRejection>,
) -> Result<Json<Vec<Court>>, AppError> {
    let Query(query) = query?;
    let sport = query
        .sport
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let db = state.db()?;
    Ok(Json(queries::list_courts(&db, sport)?))
}

// POST /courts
pub async fn create_court(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<CourtPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Court>), AppError> {
    require_admin(&headers, &state.config)?;
    let Json(payload) = payload?;
    let new = payload.validate()?;

    let db = state.db()?;
    let court = queries::insert_court(&db, &new)?;
    tracing::info!(court_id = court.id, court_type = %court.court_type, "court created");

    Ok((StatusCode::CREATED, Json(court)))
}

// GET /courts/:id
pub async fn get_court(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Court>, AppError> {
    let Path(id) = path?;
    let db = state.db()?;
    queries::get_court(&db, id)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("court {id}")))
}

// PUT /courts/:id
pub async fn update_court(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CourtPayload>, JsonRejection>,
) -> Result<Json<Court>, AppError> {
    require_admin(&headers, &state.config)?;
    let Path(id) = path?;

    let db = state.db()?;
    if !queries::court_exists(&db, id)? {
        return Err(AppError::NotFound(format!("court {id}")));
    }
    let Json(payload) = payload?;
    let new = payload.validate()?;

    queries::update_court(&db, id, &new)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("court {id}")))
}

// DELETE /courts/:id
pub async fn delete_court(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    require_admin(&headers, &state.config)?;
    let Path(id) = path?;

    let db = state.db()?;
    if !queries::delete_court(&db, id)? {
        return Err(AppError::NotFound(format!("court {id}")));
    }
    tracing::info!(court_id = id, "court deleted with its schedules and bookings");

    Ok(StatusCode::NO_CONTENT)
}
