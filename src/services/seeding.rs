use rusqlite::{Connection, TransactionBehavior};
use rust_decimal::Decimal;

use crate::db::queries;
use crate::models::{NewSchedule, SlotHour};

const PEAK_START: u8 = 11;
const PEAK_END: u8 = 14;

/// Default price for a slot: 25.00 over the midday peak, 20.00 otherwise.
pub fn default_price(hour: SlotHour) -> Decimal {
    if (PEAK_START..=PEAK_END).contains(&hour.get()) {
        Decimal::new(2500, 2)
    } else {
        Decimal::new(2000, 2)
    }
}

/// Fills in a slot for every court and hour that lacks one. Existing slots
/// keep their price. Returns how many slots were created.
pub fn seed_schedules(conn: &mut Connection) -> rusqlite::Result<usize> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let mut created = 0;
    for court_id in queries::list_court_ids(&tx)? {
        for hour in SlotHour::all() {
            let slot = NewSchedule {
                court_id,
                hour,
                price: default_price(hour),
            };
            if queries::insert_schedule_if_absent(&tx, &slot)? {
                created += 1;
            }
        }
    }

    tx.commit()?;

    tracing::info!(created, "seeded schedules");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::db::queries::ScheduleFilter;
    use crate::models::NewCourt;
    use rust_decimal_macros::dec;

    fn add_court(conn: &Connection, name: &str) -> i64 {
        queries::insert_court(
            conn,
            &NewCourt {
                court_name: name.into(),
                court_type: "tennis".into(),
                surface: "hard".into(),
                image_url: None,
            },
        )
        .unwrap()
        .id
    }

    #[test]
    fn test_default_price_peak_hours() {
        let price = |h| default_price(SlotHour::new(h).unwrap());
        assert_eq!(price(9), dec!(20.00));
        assert_eq!(price(10), dec!(20.00));
        assert_eq!(price(11), dec!(25.00));
        assert_eq!(price(14), dec!(25.00));
        assert_eq!(price(15), dec!(20.00));
        assert_eq!(price(18), dec!(20.00));
    }

    #[test]
    fn test_seed_fills_every_court_hour() {
        let mut conn = db::init_db(":memory:").unwrap();
        add_court(&conn, "Court A");
        add_court(&conn, "Court B");

        assert_eq!(seed_schedules(&mut conn).unwrap(), 20);

        let all = queries::list_schedules(&conn, &ScheduleFilter::default()).unwrap();
        assert_eq!(all.len(), 20);
        assert_eq!(all[0].price.to_string(), "20.00");
    }

    #[test]
    fn test_seed_is_idempotent_and_keeps_prices() {
        let mut conn = db::init_db(":memory:").unwrap();
        let court_id = add_court(&conn, "Court A");
        queries::insert_schedule(
            &conn,
            &NewSchedule {
                court_id,
                hour: SlotHour::new(10).unwrap(),
                price: dec!(42.00),
            },
        )
        .unwrap();

        assert_eq!(seed_schedules(&mut conn).unwrap(), 9);
        assert_eq!(seed_schedules(&mut conn).unwrap(), 0);

        let ten = queries::find_schedule_id(&conn, court_id, SlotHour::new(10).unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(queries::get_schedule(&conn, ten).unwrap().unwrap().price, dec!(42.00));
    }
}
