use crate::calc::dates::week_end;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Fixed minimum lead time: leave cannot be requested for today or the next
/// three days. This is a business rule, not a config knob.
pub const LEAD_TIME_DAYS: i64 = 4;

/// How far into the future a user may book, relative to today.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WeekRange {
    #[default]
    OneWeek,
    TwoWeeks,
    OneMonth,
}

impl WeekRange {
    pub fn label(&self) -> &'static str {
        match self {
            WeekRange::OneWeek => "1 week",
            WeekRange::TwoWeeks => "2 weeks",
            WeekRange::OneMonth => "1 month",
        }
    }

    /// Next value in cycle order, for the policy editor.
    pub fn cycled(&self) -> WeekRange {
        match self {
            WeekRange::OneWeek => WeekRange::TwoWeeks,
            WeekRange::TwoWeeks => WeekRange::OneMonth,
            WeekRange::OneMonth => WeekRange::OneWeek,
        }
    }
}

/// Inclusive booking window for a given reference day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BookingWindow {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
}

impl BookingWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.min_date && date <= self.max_date
    }

    /// True when the lead time has already consumed the whole range, which
    /// happens late in the week under `OneWeek`.
    pub fn is_empty(&self) -> bool {
        self.min_date > self.max_date
    }
}

/// Computes the inclusive `[min_date, max_date]` booking window.
///
/// `min_date` is always `today + 4` days. `max_date` is the Sunday ending the
/// current Monday-start week for `OneWeek`, that Sunday plus seven days for
/// `TwoWeeks`, and a fixed `today + 30` days for `OneMonth`, not the end of
/// the next calendar month.
pub fn resolve_window(today: NaiveDate, range: WeekRange) -> BookingWindow {
    let min_date = today + Duration::days(LEAD_TIME_DAYS);
    let max_date = match range {
        WeekRange::OneWeek => week_end(today),
        WeekRange::TwoWeeks => week_end(today) + Duration::days(7),
        WeekRange::OneMonth => today + Duration::days(30),
    };
    BookingWindow { min_date, max_date }
}
