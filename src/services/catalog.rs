use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::validation::NON_FIELD_ERRORS;
use crate::models::{NewSchedule, Schedule};

const DUPLICATE_SLOT: &str = "The fields court_id, hour must make a unique set.";

fn unknown_court(court_id: i64) -> AppError {
    AppError::field(
        "court_id",
        format!("Invalid pk \"{court_id}\" - object does not exist."),
    )
}

/// Checks the slot's court exists and that (court, hour) is free, ignoring
/// the slot being replaced when `current_id` is set.
fn check_slot(conn: &Connection, slot: &NewSchedule, current_id: Option<i64>) -> Result<(), AppError> {
    if !queries::court_exists(conn, slot.court_id)? {
        return Err(unknown_court(slot.court_id));
    }

    match queries::find_schedule_id(conn, slot.court_id, slot.hour)? {
        Some(existing) if Some(existing) != current_id => {
            Err(AppError::field(NON_FIELD_ERRORS, DUPLICATE_SLOT))
        }
        _ => Ok(()),
    }
}

fn map_unique(err: rusqlite::Error) -> AppError {
    if queries::is_unique_violation(&err) {
        AppError::field(NON_FIELD_ERRORS, DUPLICATE_SLOT)
    } else {
        err.into()
    }
}

pub fn create_schedule(conn: &Connection, slot: NewSchedule) -> Result<Schedule, AppError> {
    check_slot(conn, &slot, None)?;

    let schedule = queries::insert_schedule(conn, &slot).map_err(map_unique)?;
    tracing::info!(
        schedule_id = schedule.id,
        court_id = schedule.court_id,
        hour = %schedule.hour,
        "schedule created"
    );
    Ok(schedule)
}

pub fn update_schedule(conn: &Connection, id: i64, slot: NewSchedule) -> Result<Schedule, AppError> {
    if queries::get_schedule(conn, id)?.is_none() {
        return Err(AppError::NotFound(format!("schedule {id}")));
    }
    check_slot(conn, &slot, Some(id))?;

    queries::update_schedule(conn, id, &slot)
        .map_err(map_unique)?
        .ok_or_else(|| AppError::NotFound(format!("schedule {id}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::{NewCourt, SlotHour};
    use rust_decimal_macros::dec;

    fn setup() -> (Connection, i64) {
        let conn = db::init_db(":memory:").unwrap();
        let court = queries::insert_court(
            &conn,
            &NewCourt {
                court_name: "Court A".into(),
                court_type: "tennis".into(),
                surface: "clay".into(),
                image_url: None,
            },
        )
        .unwrap();
        (conn, court.id)
    }

    fn slot(court_id: i64, hour: i64) -> NewSchedule {
        NewSchedule {
            court_id,
            hour: SlotHour::new(hour).unwrap(),
            price: dec!(20.00),
        }
    }

    #[test]
    fn test_duplicate_court_hour_rejected() {
        let (conn, court_id) = setup();
        create_schedule(&conn, slot(court_id, 10)).unwrap();

        let err = create_schedule(&conn, slot(court_id, 10)).unwrap_err();
        assert_eq!(
            err.field_errors().unwrap().get(NON_FIELD_ERRORS).unwrap(),
            [DUPLICATE_SLOT]
        );
    }

    #[test]
    fn test_unknown_court_rejected() {
        let (conn, _) = setup();
        let err = create_schedule(&conn, slot(77, 10)).unwrap_err();
        assert!(err.field_errors().unwrap().contains("court_id"));
    }

    #[test]
    fn test_update_keeps_own_hour() {
        let (conn, court_id) = setup();
        let created = create_schedule(&conn, slot(court_id, 10)).unwrap();

        let mut repriced = slot(court_id, 10);
        repriced.price = dec!(30.00);
        let updated = update_schedule(&conn, created.id, repriced).unwrap();
        assert_eq!(updated.price, dec!(30.00));
    }

    #[test]
    fn test_update_onto_taken_hour_rejected() {
        let (conn, court_id) = setup();
        create_schedule(&conn, slot(court_id, 10)).unwrap();
        let eleven = create_schedule(&conn, slot(court_id, 11)).unwrap();

        let err = update_schedule(&conn, eleven.id, slot(court_id, 10)).unwrap_err();
        assert!(err.field_errors().unwrap().contains(NON_FIELD_ERRORS));
    }

    #[test]
    fn test_update_missing_schedule() {
        let (conn, court_id) = setup();
        assert!(matches!(
            update_schedule(&conn, 5, slot(court_id, 10)),
            Err(AppError::NotFound(_))
        ));
    }
}
