use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use super::schedule::SlotHour;
use super::validation::{missing, required_text, FieldErrors};

const MAX_NAME_LEN: usize = 100;
const MAX_PHONE_LEN: usize = 20;
const MAX_EMAIL_LEN: usize = 254;
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: String,
    pub schedule_id: i64,
    pub date: NaiveDate,
    pub contact: Contact,
    pub created_at: NaiveDateTime,
}

/// A booking joined with the slot and court it reserves.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDetails {
    pub booking: Booking,
    pub court_id: i64,
    pub court_name: String,
    pub court_type: String,
    pub court_image_url: Option<String>,
    pub hour: SlotHour,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingPayload {
    pub schedule_id: Option<i64>,
    /// Calendar date as `YYYY-MM-DD`; parsed during validation so a bad
    /// value is reported against `date`.
    pub date: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub schedule_id: i64,
    pub date: NaiveDate,
    pub contact: Contact,
}

impl BookingPayload {
    pub fn validate(self) -> Result<NewBooking, FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.schedule_id.is_none() {
            missing(&mut errors, "schedule_id");
        }
        let date = match self.date.as_deref().map(str::trim) {
            None | Some("") => {
                missing(&mut errors, "date");
                None
            }
            Some(raw) => {
                let date = NaiveDate::parse_from_str(raw, DATE_FORMAT).ok();
                if date.is_none() {
                    errors.add("date", "Date has wrong format or does not exist. Use YYYY-MM-DD.");
                }
                date
            }
        };

        let name = required_text(&mut errors, "name", self.name, MAX_NAME_LEN);
        let surname = required_text(&mut errors, "surname", self.surname, MAX_NAME_LEN);
        let phone = required_text(&mut errors, "phone", self.phone, MAX_PHONE_LEN);
        let email = required_text(&mut errors, "email", self.email, MAX_EMAIL_LEN).and_then(|email| {
            if email.validate_email() {
                Some(email)
            } else {
                errors.add("email", "Enter a valid email address.");
                None
            }
        });

        match (self.schedule_id, date, name, surname, email, phone) {
            (Some(schedule_id), Some(date), Some(name), Some(surname), Some(email), Some(phone))
                if errors.is_empty() =>
            {
                Ok(NewBooking {
                    schedule_id,
                    date,
                    contact: Contact {
                        name,
                        surname,
                        email,
                        phone,
                    },
                })
            }
            _ => Err(errors),
        }
    }
}
