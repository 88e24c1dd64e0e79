use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use rust_decimal::Decimal;

use crate::models::{
    Booking, BookingDetails, Contact, Court, NewCourt, NewSchedule, Schedule, SlotHour,
};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// True when `err` was raised by a UNIQUE constraint.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

// ── Courts ──

const COURT_COLUMNS: &str = "id, court_name, court_type, surface, image_url";

fn parse_court_row(row: &rusqlite::Row) -> rusqlite::Result<Court> {
    Ok(Court {
        id: row.get(0)?,
        court_name: row.get(1)?,
        court_type: row.get(2)?,
        surface: row.get(3)?,
        image_url: row.get(4)?,
    })
}

/// Lists courts, optionally keeping only those whose type matches `sport`
/// ignoring case. SQLite's NOCASE only folds ASCII, so the match is done here.
pub fn list_courts(conn: &Connection, sport: Option<&str>) -> rusqlite::Result<Vec<Court>> {
    let mut stmt = conn.prepare(&format!("SELECT {COURT_COLUMNS} FROM courts ORDER BY id ASC"))?;

    let rows = stmt.query_map([], parse_court_row)?;
    let courts = rows.collect::<rusqlite::Result<Vec<Court>>>()?;

    let Some(sport) = sport.map(str::to_lowercase) else {
        return Ok(courts);
    };
    Ok(courts
        .into_iter()
        .filter(|c| c.court_type.to_lowercase() == sport)
        .collect())
}

pub fn get_court(conn: &Connection, id: i64) -> rusqlite::Result<Option<Court>> {
    conn.query_row(
        &format!("SELECT {COURT_COLUMNS} FROM courts WHERE id = ?1"),
        params![id],
        parse_court_row,
    )
    .optional()
}

pub fn court_exists(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM courts WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )
}

pub fn list_court_ids(conn: &Connection) -> rusqlite::Result<Vec<i64>> {
    let mut stmt = conn.prepare("SELECT id FROM courts ORDER BY id ASC")?;
    let rows = stmt.query_map([], |row| row.get(0))?;
    rows.collect()
}

pub fn insert_court(conn: &Connection, court: &NewCourt) -> rusqlite::Result<Court> {
    conn.execute(
        "INSERT INTO courts (court_name, court_type, surface, image_url) VALUES (?1, ?2, ?3, ?4)",
        params![
            court.court_name,
            court.court_type,
            court.surface,
            court.image_url
        ],
    )?;

    Ok(Court {
        id: conn.last_insert_rowid(),
        court_name: court.court_name.clone(),
        court_type: court.court_type.clone(),
        surface: court.surface.clone(),
        image_url: court.image_url.clone(),
    })
}

pub fn update_court(conn: &Connection, id: i64, court: &NewCourt) -> rusqlite::Result<Option<Court>> {
    let count = conn.execute(
        "UPDATE courts SET court_name = ?1, court_type = ?2, surface = ?3, image_url = ?4 WHERE id = ?5",
        params![
            court.court_name,
            court.court_type,
            court.surface,
            court.image_url,
            id
        ],
    )?;

    if count == 0 {
        return Ok(None);
    }
    get_court(conn, id)
}

pub fn delete_court(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let count = conn.execute("DELETE FROM courts WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Schedules ──

const SCHEDULE_COLUMNS: &str = "s.id, s.court_id, s.hour, s.price";

#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduleFilter {
    pub court_id: Option<i64>,
    /// Keep only slots with no booking on this date.
    pub available_on: Option<NaiveDate>,
}

fn parse_schedule_row(row: &rusqlite::Row) -> rusqlite::Result<Schedule> {
    let hour_raw: i64 = row.get(2)?;
    let price_str: String = row.get(3)?;

    let hour = SlotHour::new(hour_raw)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(2, hour_raw))?;
    let price = Decimal::from_str(&price_str).map_err(|e| conversion_error(3, e))?;

    Ok(Schedule {
        id: row.get(0)?,
        court_id: row.get(1)?,
        hour,
        price,
    })
}

pub fn list_schedules(conn: &Connection, filter: &ScheduleFilter) -> rusqlite::Result<Vec<Schedule>> {
    let date = filter.available_on.map(|d| d.format(DATE_FORMAT).to_string());

    let mut stmt = conn.prepare(&format!(
        "SELECT {SCHEDULE_COLUMNS} FROM schedules s
         WHERE (?1 IS NULL OR s.court_id = ?1)
           AND (?2 IS NULL OR NOT EXISTS (
                SELECT 1 FROM bookings b WHERE b.schedule_id = s.id AND b.booking_date = ?2))
         ORDER BY s.court_id ASC, s.hour ASC"
    ))?;

    let rows = stmt.query_map(params![filter.court_id, date], parse_schedule_row)?;
    rows.collect()
}

pub fn get_schedule(conn: &Connection, id: i64) -> rusqlite::Result<Option<Schedule>> {
    conn.query_row(
        &format!("SELECT {SCHEDULE_COLUMNS} FROM schedules s WHERE s.id = ?1"),
        params![id],
        parse_schedule_row,
    )
    .optional()
}

/// Id of the slot already occupying (court, hour), if any.
pub fn find_schedule_id(conn: &Connection, court_id: i64, hour: SlotHour) -> rusqlite::Result<Option<i64>> {
    conn.query_row(
        "SELECT id FROM schedules WHERE court_id = ?1 AND hour = ?2",
        params![court_id, hour.get()],
        |row| row.get(0),
    )
    .optional()
}

pub fn insert_schedule(conn: &Connection, schedule: &NewSchedule) -> rusqlite::Result<Schedule> {
    conn.execute(
        "INSERT INTO schedules (court_id, hour, price) VALUES (?1, ?2, ?3)",
        params![
            schedule.court_id,
            schedule.hour.get(),
            schedule.price.to_string()
        ],
    )?;

    Ok(Schedule {
        id: conn.last_insert_rowid(),
        court_id: schedule.court_id,
        hour: schedule.hour,
        price: schedule.price,
    })
}

/// Inserts the slot unless (court, hour) is already taken. Returns whether a
/// row was written.
pub fn insert_schedule_if_absent(conn: &Connection, schedule: &NewSchedule) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "INSERT OR IGNORE INTO schedules (court_id, hour, price) VALUES (?1, ?2, ?3)",
        params![
            schedule.court_id,
            schedule.hour.get(),
            schedule.price.to_string()
        ],
    )?;
    Ok(count > 0)
}

pub fn update_schedule(
    conn: &Connection,
    id: i64,
    schedule: &NewSchedule,
) -> rusqlite::Result<Option<Schedule>> {
    let count = conn.execute(
        "UPDATE schedules SET court_id = ?1, hour = ?2, price = ?3 WHERE id = ?4",
        params![
            schedule.court_id,
            schedule.hour.get(),
            schedule.price.to_string(),
            id
        ],
    )?;

    if count == 0 {
        return Ok(None);
    }
    get_schedule(conn, id)
}

pub fn delete_schedule(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let count = conn.execute("DELETE FROM schedules WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Bookings ──

const BOOKING_DETAIL_COLUMNS: &str = "b.id, b.schedule_id, b.booking_date, b.name, b.surname, b.email, b.phone, b.created_at, \
     c.id, c.court_name, c.court_type, c.image_url, s.hour";

const BOOKING_DETAIL_FROM: &str = "FROM bookings b
     JOIN schedules s ON s.id = b.schedule_id
     JOIN courts c ON c.id = s.court_id";

#[derive(Debug, Clone, Copy, Default)]
pub struct BookingFilter {
    pub date: Option<NaiveDate>,
    pub court_id: Option<i64>,
}

fn parse_booking_row(row: &rusqlite::Row) -> rusqlite::Result<BookingDetails> {
    let date_str: String = row.get(2)?;
    let created_at_str: String = row.get(7)?;
    let hour_raw: i64 = row.get(12)?;

    let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT).map_err(|e| conversion_error(2, e))?;
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, TIMESTAMP_FORMAT)
        .map_err(|e| conversion_error(7, e))?;
    let hour = SlotHour::new(hour_raw)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(12, hour_raw))?;

    Ok(BookingDetails {
        booking: Booking {
            id: row.get(0)?,
            schedule_id: row.get(1)?,
            date,
            contact: Contact {
                name: row.get(3)?,
                surname: row.get(4)?,
                email: row.get(5)?,
                phone: row.get(6)?,
            },
            created_at,
        },
        court_id: row.get(8)?,
        court_name: row.get(9)?,
        court_type: row.get(10)?,
        court_image_url: row.get(11)?,
        hour,
    })
}

pub fn list_bookings(conn: &Connection, filter: &BookingFilter) -> rusqlite::Result<Vec<BookingDetails>> {
    let date = filter.date.map(|d| d.format(DATE_FORMAT).to_string());

    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_DETAIL_COLUMNS} {BOOKING_DETAIL_FROM}
         WHERE (?1 IS NULL OR b.booking_date = ?1)
           AND (?2 IS NULL OR c.id = ?2)
         ORDER BY b.booking_date ASC, s.hour ASC, c.id ASC"
    ))?;

    let rows = stmt.query_map(params![date, filter.court_id], parse_booking_row)?;
    rows.collect()
}

pub fn get_booking(conn: &Connection, id: &str) -> rusqlite::Result<Option<BookingDetails>> {
    conn.query_row(
        &format!("SELECT {BOOKING_DETAIL_COLUMNS} {BOOKING_DETAIL_FROM} WHERE b.id = ?1"),
        params![id],
        parse_booking_row,
    )
    .optional()
}

pub fn booking_exists(conn: &Connection, schedule_id: i64, date: NaiveDate) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM bookings WHERE schedule_id = ?1 AND booking_date = ?2",
        params![schedule_id, date.format(DATE_FORMAT).to_string()],
        |row| row.get(0),
    )
}

pub fn insert_booking(conn: &Connection, booking: &Booking) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, schedule_id, booking_date, name, surname, email, phone, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            booking.id,
            booking.schedule_id,
            booking.date.format(DATE_FORMAT).to_string(),
            booking.contact.name,
            booking.contact.surname,
            booking.contact.email,
            booking.contact.phone,
            booking.created_at.format(TIMESTAMP_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn update_booking_contact(conn: &Connection, id: &str, contact: &Contact) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET name = ?1, surname = ?2, email = ?3, phone = ?4 WHERE id = ?5",
        params![
            contact.name,
            contact.surname,
            contact.email,
            contact.phone,
            id
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_booking(conn: &Connection, id: &str) -> rusqlite::Result<bool> {
    let count = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
    Ok(count > 0)
}
