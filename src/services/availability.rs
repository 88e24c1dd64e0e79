use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db::queries;

/// A slot is available on `date` iff no booking holds (slot, date).
pub fn is_available(conn: &Connection, schedule_id: i64, date: NaiveDate) -> rusqlite::Result<bool> {
    Ok(!queries::booking_exists(conn, schedule_id, date)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::{Booking, Contact, NewCourt, NewSchedule, SlotHour};
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
        let slot = queries::insert_schedule(
            &conn,
            &NewSchedule {
                court_id: court.id,
                hour: SlotHour::new(10).unwrap(),
                price: dec!(20.00),
            },
        )
        .unwrap();
        (conn, slot.id)
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_unbooked_slot_is_available() {
        let (conn, slot_id) = setup();
        assert!(is_available(&conn, slot_id, date("2024-06-01")).unwrap());
    }

    #[test]
    fn test_booked_slot_only_unavailable_on_that_date() {
        let (conn, slot_id) = setup();
        queries::insert_booking(
            &conn,
            &Booking {
                id: "b-1".into(),
                schedule_id: slot_id,
                date: date("2024-06-01"),
                contact: Contact {
                    name: "Mario".into(),
                    surname: "Rossi".into(),
                    email: "mario@example.com".into(),
                    phone: "3331234567".into(),
                },
                created_at: chrono::Utc::now().naive_utc(),
            },
        )
        .unwrap();

        assert!(!is_available(&conn, slot_id, date("2024-06-01")).unwrap());
        assert!(is_available(&conn, slot_id, date("2024-06-02")).unwrap());
    }

    #[test]
    fn test_unknown_slot_reports_available() {
        let (conn, _) = setup();
        assert!(is_available(&conn, 999, date("2024-06-01")).unwrap());
    }
}
