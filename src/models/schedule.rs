use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::validation::{missing, FieldErrors};

pub const OPENING_HOUR: u8 = 9;
pub const LAST_SLOT_HOUR: u8 = 18;

/// Price columns hold at most this many digits, two of them after the point.
const PRICE_MAX_DIGITS: u32 = 6;
const PRICE_DECIMAL_PLACES: u32 = 2;

/// Hour of day a slot starts at, always within `OPENING_HOUR..=LAST_SLOT_HOUR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SlotHour(u8);

impl SlotHour {
    pub fn new(hour: i64) -> Option<Self> {
        if (OPENING_HOUR as i64..=LAST_SLOT_HOUR as i64).contains(&hour) {
            Some(Self(hour as u8))
        } else {
            None
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn label(self) -> String {
        self.to_string()
    }

    pub fn all() -> impl Iterator<Item = SlotHour> {
        (OPENING_HOUR..=LAST_SLOT_HOUR).map(SlotHour)
    }
}

impl fmt::Display for SlotHour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schedule {
    pub id: i64,
    pub court_id: i64,
    pub hour: SlotHour,
    pub price: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchedulePayload {
    pub court_id: Option<i64>,
    pub hour: Option<i64>,
    pub price: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSchedule {
    pub court_id: i64,
    pub hour: SlotHour,
    pub price: Decimal,
}

impl SchedulePayload {
    pub fn validate(self) -> Result<NewSchedule, FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.court_id.is_none() {
            missing(&mut errors, "court_id");
        }

        let hour = match self.hour {
            None => {
                missing(&mut errors, "hour");
                None
            }
            Some(raw) => {
                let hour = SlotHour::new(raw);
                if hour.is_none() {
                    errors.add(
                        "hour",
                        format!(
                            "\"{raw}\" is not a valid choice. Hours run from {OPENING_HOUR} to {LAST_SLOT_HOUR}."
                        ),
                    );
                }
                hour
            }
        };

        let price = match self.price {
            None => {
                missing(&mut errors, "price");
                None
            }
            Some(price) => normalize_price(&mut errors, price),
        };

        match (self.court_id, hour, price) {
            (Some(court_id), Some(hour), Some(price)) if errors.is_empty() => Ok(NewSchedule {
                court_id,
                hour,
                price,
            }),
            _ => Err(errors),
        }
    }
}

/// Checks the price fits the stored precision and returns it with exactly two
/// decimal places.
fn normalize_price(errors: &mut FieldErrors, price: Decimal) -> Option<Decimal> {
    let price = price.normalize();

    if price.is_sign_negative() && !price.is_zero() {
        errors.add("price", "Ensure this value is greater than or equal to 0.");
        return None;
    }
    if price.scale() > PRICE_DECIMAL_PLACES {
        errors.add(
            "price",
            format!("Ensure that there are no more than {PRICE_DECIMAL_PLACES} decimal places."),
        );
        return None;
    }

    let max_whole = Decimal::from(10_i64.pow(PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES));
    if price.abs() >= max_whole {
        errors.add(
            "price",
            format!(
                "Ensure that there are no more than {} digits before the decimal point.",
                PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES
            ),
        );
        return None;
    }

    let mut price = price.abs();
    price.rescale(PRICE_DECIMAL_PLACES);
    Some(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn payload(hour: i64, price: Decimal) -> SchedulePayload {
        SchedulePayload {
            court_id: Some(1),
            hour: Some(hour),
            price: Some(price),
        }
    }

    #[test]
    fn test_slot_hour_bounds() {
        assert!(SlotHour::new(8).is_none());
        assert_eq!(SlotHour::new(9).unwrap().get(), 9);
        assert_eq!(SlotHour::new(18).unwrap().get(), 18);
        assert!(SlotHour::new(19).is_none());
        assert!(SlotHour::new(-1).is_none());
    }

    #[test]
    fn test_slot_hour_all_covers_day() {
        let hours: Vec<u8> = SlotHour::all().map(SlotHour::get).collect();
        assert_eq!(hours, (9..=18).collect::<Vec<u8>>());
    }

    #[test]
    fn test_slot_hour_label() {
        assert_eq!(SlotHour::new(9).unwrap().label(), "09:00");
        assert_eq!(SlotHour::new(14).unwrap().to_string(), "14:00");
    }

    #[test]
    fn test_valid_schedule_price_rescaled() {
        let schedule = payload(10, dec!(20)).validate().unwrap();
        assert_eq!(schedule.hour.get(), 10);
        assert_eq!(schedule.price.to_string(), "20.00");
    }

    #[test]
    fn test_hour_out_of_range_rejected() {
        for hour in [0, 8, 19, 23] {
            let errors = payload(hour, dec!(20)).validate().unwrap_err();
            assert!(errors.contains("hour"), "hour {hour} should be rejected");
        }
    }

    #[test]
    fn test_price_precision_rejected() {
        let errors = payload(10, dec!(20.005)).validate().unwrap_err();
        assert!(errors.contains("price"));

        let errors = payload(10, dec!(10000)).validate().unwrap_err();
        assert!(errors.contains("price"));

        let errors = payload(10, dec!(-1)).validate().unwrap_err();
        assert!(errors.contains("price"));
    }

    #[test]
    fn test_trailing_zeros_accepted() {
        let schedule = payload(10, dec!(9999.990)).validate().unwrap();
        assert_eq!(schedule.price.to_string(), "9999.99");
    }

    #[test]
    fn test_missing_fields() {
        let errors = SchedulePayload::default().validate().unwrap_err();
        assert!(errors.contains("court_id"));
        assert!(errors.contains("hour"));
        assert!(errors.contains("price"));
    }
}
