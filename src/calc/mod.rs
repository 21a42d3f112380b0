pub mod dates;
pub mod eligibility;
pub mod week;
pub mod window;

pub use dates::{date_key, parse_date_key, week_start, weekday_index};
pub use eligibility::{
    can_submit, classify, shift_is_offerable, DenyReason, EligibilityResult, ReasonCode,
};
pub use week::compute_booked_weeks;
pub use window::{resolve_window, BookingWindow, WeekRange, LEAD_TIME_DAYS};
