pub mod booking;
pub mod court;
pub mod schedule;
pub mod validation;

pub use booking::{Booking, BookingDetails, BookingPayload, Contact, NewBooking};
pub use court::{Court, CourtPayload, NewCourt};
pub use schedule::{NewSchedule, Schedule, SchedulePayload, SlotHour};
pub use validation::FieldErrors;
