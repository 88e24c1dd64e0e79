use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::require_admin;
use crate::db::queries::{self, BookingFilter, DATE_FORMAT, TIMESTAMP_FORMAT};
use crate::errors::AppError;
use crate::models::{BookingDetails, BookingPayload};
use crate::services::booking;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    id: String,
    schedule_id: i64,
    date: String,
    name: String,
    surname: String,
    email: String,
    phone: String,
    created_at: String,
    court_id: i64,
    court_name: String,
    court_type: String,
    court_image_url: Option<String>,
    hour: u8,
    time_label: String,
}

impl From<BookingDetails> for BookingResponse {
    fn from(d: BookingDetails) -> Self {
        let b = d.booking;
        Self {
            id: b.id,
            schedule_id: b.schedule_id,
            date: b.date.format(DATE_FORMAT).to_string(),
            name: b.contact.name,
            surname: b.contact.surname,
            email: b.contact.email,
            phone: b.contact.phone,
            created_at: b.created_at.format(TIMESTAMP_FORMAT).to_string(),
            court_id: d.court_id,
            court_name: d.court_name,
            court_type: d.court_type,
            court_image_url: d.court_image_url,
            hour: d.hour.get(),
            time_label: d.hour.label(),
        }
    }
}

// GET /bookings
#[derive(Debug, Deserialize)]
pub struct BookingsQuery {
    pub date: Option<NaiveDate>,
    pub court_id: Option<i64>,
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    query: Result<Query<BookingsQuery>, QueryRejection>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    require_admin(&headers, &state.config)?;
    let Query(query) = query?;
    let filter = BookingFilter {
        date: query.date,
        court_id: query.court_id,
    };

    let db = state.db()?;
    let bookings = queries::list_bookings(&db, &filter)?;

    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

// POST /bookings (open to anonymous customers)
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BookingPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let Json(payload) = payload?;
    let new = payload.validate()?;

    let mut db = state.db()?;
    let details = booking::create_booking(&mut db, new)?;

    Ok((StatusCode::CREATED, Json(details.into())))
}

// GET /bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<BookingResponse>, AppError> {
    require_admin(&headers, &state.config)?;
    let Path(id) = path?;

    let db = state.db()?;
    queries::get_booking(&db, &id)?
        .map(|d| Json(d.into()))
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))
}

// PUT /bookings/:id
pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<BookingPayload>, JsonRejection>,
) -> Result<Json<BookingResponse>, AppError> {
    require_admin(&headers, &state.config)?;
    let Path(id) = path?;

    let db = state.db()?;
    if queries::get_booking(&db, &id)?.is_none() {
        return Err(AppError::NotFound(format!("booking {id}")));
    }
    let Json(payload) = payload?;
    let new = payload.validate()?;

    let details = booking::update_booking(&db, &id, new)?;
    Ok(Json(details.into()))
}

// DELETE /bookings/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, AppError> {
    require_admin(&headers, &state.config)?;
    let Path(id) = path?;

    let db = state.db()?;
    booking::delete_booking(&db, &id)?;

    Ok(StatusCode::NO_CONTENT)
}
