use crate::calc::dates::{parse_date_key, week_start};
use crate::data::Leave;
use chrono::NaiveDate;
use std::collections::HashSet;

/// Builds the set of Monday week-start keys in which `user_id` already holds
/// an active (pending or approved) leave. Rejected leaves never block a week.
///
/// Rebuilt from scratch whenever the leave list changes; the input is bounded
/// by one user's leave count, so there is no incremental index.
pub fn compute_booked_weeks(leaves: &[Leave], user_id: &str) -> HashSet<NaiveDate> {
    leaves
        .iter()
        .filter(|l| l.user_id == user_id && l.status.is_active())
        .filter_map(|l| parse_date_key(&l.date).ok())
        .map(week_start)
        .collect()
}
