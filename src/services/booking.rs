use chrono::Utc;
use rusqlite::{Connection, TransactionBehavior};
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingDetails, FieldErrors, NewBooking};
use crate::services::availability;

pub const SLOT_TAKEN: &str = "This time slot is already booked for the selected date.";

fn slot_taken() -> AppError {
    AppError::field("date", SLOT_TAKEN)
}

fn unknown_schedule(schedule_id: i64) -> AppError {
    AppError::field(
        "schedule_id",
        format!("Invalid pk \"{schedule_id}\" - object does not exist."),
    )
}

/// Admits a booking for (slot, date). The availability check and the insert
/// share one immediate transaction; the UNIQUE(schedule_id, booking_date)
/// constraint rejects anything that still slips through.
pub fn create_booking(conn: &mut Connection, new: NewBooking) -> Result<BookingDetails, AppError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    if queries::get_schedule(&tx, new.schedule_id)?.is_none() {
        return Err(unknown_schedule(new.schedule_id));
    }

    if !availability::is_available(&tx, new.schedule_id, new.date)? {
        tracing::warn!(schedule_id = new.schedule_id, date = %new.date, "booking rejected: slot taken");
        return Err(slot_taken());
    }

    let booking = Booking {
        id: Uuid::new_v4().to_string(),
        schedule_id: new.schedule_id,
        date: new.date,
        contact: new.contact,
        created_at: Utc::now().naive_utc(),
    };

    match queries::insert_booking(&tx, &booking) {
        Ok(()) => {}
        Err(e) if queries::is_unique_violation(&e) => {
            tracing::warn!(schedule_id = booking.schedule_id, date = %booking.date, "booking rejected by unique constraint");
            return Err(slot_taken());
        }
        Err(e) => return Err(e.into()),
    }

    let details = queries::get_booking(&tx, &booking.id)?
        .ok_or_else(|| AppError::Internal(format!("booking {} vanished after insert", booking.id)))?;

    tx.commit()?;

    tracing::info!(
        booking_id = %details.booking.id,
        schedule_id = details.booking.schedule_id,
        date = %details.booking.date,
        "booking created"
    );

    Ok(details)
}

/// Replaces the customer contact fields of a booking. The reserved slot and
/// date are fixed once booked; moving a reservation means deleting and
/// booking again.
pub fn update_booking(conn: &Connection, id: &str, new: NewBooking) -> Result<BookingDetails, AppError> {
    let existing = queries::get_booking(conn, id)?
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;

    let mut errors = FieldErrors::new();
    if existing.booking.schedule_id != new.schedule_id {
        errors.add("schedule_id", "A booking cannot be moved to another time slot.");
    }
    if existing.booking.date != new.date {
        errors.add("date", "A booking cannot be moved to another date.");
    }
    if !errors.is_empty() {
        return Err(errors.into());
    }

    queries::update_booking_contact(conn, id, &new.contact)?;

    queries::get_booking(conn, id)?.ok_or_else(|| AppError::NotFound(format!("booking {id}")))
}

pub fn delete_booking(conn: &Connection, id: &str) -> Result<(), AppError> {
    if !queries::delete_booking(conn, id)? {
        return Err(AppError::NotFound(format!("booking {id}")));
    }
    tracing::info!(booking_id = %id, "booking deleted");
    Ok(())
}
