use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::require_admin;
use crate::db::queries::{self, ScheduleFilter};
use crate::errors::AppError;
use crate::models::{Schedule, SchedulePayload};
use crate::services::{availability, catalog, seeding};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    id: i64,
    court_id: i64,
    hour: u8,
    time_label: String,
    price: Decimal,
}

impl From<Schedule> for ScheduleResponse {
    fn from(s: Schedule) -> Self {
        Self {
            id: s.id,
            court_id: s.court_id,
            hour: s.hour.get(),
            time_label: s.hour.label(),
            price: s.price,
        }
    }
}

// GET /schedules
#[derive(Debug, Deserialize)]
pub struct SchedulesQuery {
    pub court_id: Option<i64>,
    /// Only list slots still free on this date.
    pub date: Option<NaiveDate>,
}

pub async fn list_schedules(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SchedulesQuery>, QueryRejection>,
) -> Result<Json<Vec<ScheduleResponse>>, AppError> {
    let Query(query) = query?;
    let filter = ScheduleFilter {
        court_id: query.court_id,
        available_on: query.date,
    };

    let db = state.db()?;
    let schedules = queries::list_schedules(&db, &filter)?;

    Ok(Json(schedules.into_iter().map(ScheduleResponse::from).collect()))
}

// POST /schedules
pub async fn create_schedule(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<SchedulePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<ScheduleResponse>), AppError> {
    require_admin(&headers, &state.config)?;
    let Json(payload) = payload?;
    let new = payload.validate()?;

    let db = state.db()?;
    let schedule = catalog::create_schedule(&db, new)?;

    Ok((StatusCode::CREATED, Json(schedule.into())))
}

// POST /schedules/populate
pub async fn populate_schedules(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&headers, &state.config)?;

    let mut db = state.db()?;
    let created = seeding::seed_schedules(&mut db)?;

    Ok(Json(serde_json::json!({ "created": created })))
}

// GET /schedules/:id
pub async fn get_schedule(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ScheduleResponse>, AppError> {
    let Path(id) = path?;
    let db = state.db()?;
    queries::get_schedule(&db, id)?
        .map(|s| Json(s.into()))
        .ok_or_else(|| AppError::NotFound(format!("schedule {id}")))
}

// GET /schedules/:id/availability
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    schedule_id: i64,
    date: NaiveDate,
    available: bool,
}

pub async fn schedule_availability(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<AvailabilityQuery>, QueryRejection>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let Path(id) = path?;
    let Query(query) = query?;

    let db = state.db()?;
    if queries::get_schedule(&db, id)?.is_none() {
        return Err(AppError::NotFound(format!("schedule {id}")));
    }
    let date = query
        .date
        .ok_or_else(|| AppError::field("date", "This query parameter is required."))?;

    Ok(Json(AvailabilityResponse {
        schedule_id: id,
        date,
        available: availability::is_available(&db, id, date)?,
    }))
}

// PUT /schedules/:id
pub async fn update_schedule(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<SchedulePayload>, JsonRejection>,
) -> Result<Json<ScheduleResponse>, AppError> {
    require_admin(&headers, &state.config)?;
    let Path(id) = path?;

    let db = state.db()?;
    if queries::get_schedule(&db, id)?.is_none() {
        return Err(AppError::NotFound(format!("schedule {id}")));
    }
    let Json(payload) = payload?;
    let new = payload.validate()?;

    let schedule = catalog::update_schedule(&db, id, new)?;
    Ok(Json(schedule.into()))
}

// DELETE /schedules/:id
pub async fn delete_schedule(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    require_admin(&headers, &state.config)?;
    let Path(id) = path?;

    let db = state.db()?;
    if !queries::delete_schedule(&db, id)? {
        return Err(AppError::NotFound(format!("schedule {id}")));
    }
    tracing::info!(schedule_id = id, "schedule deleted with its bookings");

    Ok(StatusCode::NO_CONTENT)
}
