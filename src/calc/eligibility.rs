use crate::calc::dates::{week_start, weekday_index};
use crate::calc::window::BookingWindow;
use crate::data::{DaySlots, Leave, LeavePolicy, ShiftSlotDetail};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// Why a calendar day cannot be selected. Several may apply at once; the UI
/// renders every one of them, so classification never short-circuits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReasonCode {
    Past,
    TooFar,
    DayDisabled,
    HasActiveLeave,
    WeekAlreadyBooked,
    NoCapacity,
}

impl ReasonCode {
    /// Human-readable explanation used in accessibility labels and the CLI.
    pub fn label(&self) -> &'static str {
        match self {
            ReasonCode::Past => "before the minimum lead time",
            ReasonCode::TooFar => "beyond the booking window",
            ReasonCode::DayDisabled => "weekday blocked for leave",
            ReasonCode::HasActiveLeave => "you already have a leave request on this day",
            ReasonCode::WeekAlreadyBooked => "you already have a leave this week",
            ReasonCode::NoCapacity => "all shifts are fully booked",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classification of one calendar day. A day with no reasons is selectable;
/// a day with no slot snapshot yet is tentatively open and the shift-level
/// check decides for real once the single-date detail arrives.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EligibilityResult {
    pub reasons: BTreeSet<ReasonCode>,
}

impl EligibilityResult {
    pub fn selectable(&self) -> bool {
        self.reasons.is_empty()
    }

    pub fn has(&self, code: ReasonCode) -> bool {
        self.reasons.contains(&code)
    }
}

/// Classifies `date` against the booking window, the leave policy, the range
/// slot snapshot for that day (if fetched), the user's own leaves on that day,
/// and the user's booked-week index.
///
/// Decision order follows the rules in sequence, collecting every reason that
/// applies. The self-visit exception: a day that holds the user's own active
/// leave reports `HasActiveLeave` but never `WeekAlreadyBooked`, so the user
/// can still open that day to review or cancel the request.
pub fn classify(
    date: NaiveDate,
    window: &BookingWindow,
    policy: &LeavePolicy,
    day_slots: Option<&DaySlots>,
    leaves_on_date: &[&Leave],
    booked_weeks: &HashSet<NaiveDate>,
) -> EligibilityResult {
    let mut reasons = BTreeSet::new();

    if date < window.min_date {
        reasons.insert(ReasonCode::Past);
    }
    if date > window.max_date {
        reasons.insert(ReasonCode::TooFar);
    }
    if policy.day_disabled(weekday_index(date)) {
        reasons.insert(ReasonCode::DayDisabled);
    }

    // Rejected leaves on the same day do not block re-application.
    let holds_active = leaves_on_date.iter().any(|l| l.status.is_active());
    if holds_active {
        reasons.insert(ReasonCode::HasActiveLeave);
    }
    if booked_weeks.contains(&week_start(date)) && !holds_active {
        reasons.insert(ReasonCode::WeekAlreadyBooked);
    }

    if let Some(slots) = day_slots {
        if slots.available_slots <= 0 {
            reasons.insert(ReasonCode::NoCapacity);
        }
    }

    EligibilityResult { reasons }
}

/// Date-specific shift check used by the request form. The range snapshot is
/// rendering affordance only; this detail is the client-side authority for
/// submission (the server re-checks on top of both).
pub fn shift_is_offerable(detail: &ShiftSlotDetail) -> bool {
    detail.available_slots > 0
}

/// Why a submission attempt was refused before reaching the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DenyReason {
    DateNotSelectable,
    NoShiftChosen,
    ShiftUnavailable,
}

impl DenyReason {
    pub fn label(&self) -> &'static str {
        match self {
            DenyReason::DateNotSelectable => "this day cannot be selected",
            DenyReason::NoShiftChosen => "choose a shift first",
            DenyReason::ShiftUnavailable => "no slots left on this shift",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Admission pre-check before issuing a create-leave request. Purely local:
/// it narrows obviously invalid submissions and knows nothing about the
/// network. Races between concurrent users are resolved server-side.
pub fn can_submit(
    eligibility: &EligibilityResult,
    shift_id: Option<&str>,
    shift_detail: Option<&ShiftSlotDetail>,
) -> Result<(), DenyReason> {
    if !eligibility.selectable() {
        return Err(DenyReason::DateNotSelectable);
    }
    if shift_id.is_none() {
        return Err(DenyReason::NoShiftChosen);
    }
    match shift_detail {
        Some(detail) if shift_is_offerable(detail) => Ok(()),
        _ => Err(DenyReason::ShiftUnavailable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::window::{resolve_window, WeekRange};
    use crate::calc::week::compute_booked_weeks;
    use crate::data::{LeaveStatus, Shift};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn policy_with(disabled_days: Vec<u8>) -> LeavePolicy {
        LeavePolicy {
            disabled_days,
            week_range: WeekRange::TwoWeeks,
            shifts: vec![Shift::new("morning", "Morning", 5)],
        }
    }

    fn leave(date: &str, status: LeaveStatus) -> Leave {
        Leave {
            id: "1".to_string(),
            user_id: "alice".to_string(),
            date: date.to_string(),
            shift_id: "morning".to_string(),
            status,
            reason: None,
            created_at: d(2024, 6, 1).and_hms_opt(0, 0, 0).unwrap(),
        }
    }

    fn detail(shift_id: &str, available: i32) -> ShiftSlotDetail {
        ShiftSlotDetail {
            shift_id: shift_id.to_string(),
            total_slots: 5,
            filled_slots: 5 - available,
            available_slots: available,
        }
    }

    // Reference setup: today = Monday 2024-06-10, two-week range.
    fn window() -> BookingWindow {
        resolve_window(d(2024, 6, 10), WeekRange::TwoWeeks)
    }

    #[test]
    fn test_clean_day_is_selectable() {
        let result = classify(
            d(2024, 6, 18),
            &window(),
            &policy_with(vec![]),
            Some(&DaySlots { available_slots: 3, total_slots: 5 }),
            &[],
            &HashSet::new(),
        );
        assert!(result.selectable());
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn test_past_before_lead_time() {
        let result = classify(
            d(2024, 6, 12),
            &window(),
            &policy_with(vec![]),
            None,
            &[],
            &HashSet::new(),
        );
        assert!(result.has(ReasonCode::Past));
        assert!(!result.selectable());
    }

    #[test]
    fn test_too_far_beyond_window() {
        let result = classify(
            d(2024, 7, 1),
            &window(),
            &policy_with(vec![]),
            None,
            &[],
            &HashSet::new(),
        );
        assert!(result.has(ReasonCode::TooFar));
    }

    #[test]
    fn test_disabled_weekday_regardless_of_capacity() {
        // 2024-06-15 is a Saturday with open slots, still blocked
        let result = classify(
            d(2024, 6, 15),
            &window(),
            &policy_with(vec![0, 6]),
            Some(&DaySlots { available_slots: 4, total_slots: 5 }),
            &[],
            &HashSet::new(),
        );
        assert!(result.has(ReasonCode::DayDisabled));
        assert!(!result.selectable());
    }

    #[test]
    fn test_no_capacity_when_day_full() {
        let result = classify(
            d(2024, 6, 14),
            &window(),
            &policy_with(vec![]),
            Some(&DaySlots { available_slots: 0, total_slots: 5 }),
            &[],
            &HashSet::new(),
        );
        assert!(result.has(ReasonCode::NoCapacity));
        assert!(!result.selectable());
    }

    #[test]
    fn test_missing_snapshot_is_tentatively_open() {
        // No range entry fetched yet: no NoCapacity, final word is the
        // shift-level check on selection.
        let result = classify(
            d(2024, 6, 14),
            &window(),
            &policy_with(vec![]),
            None,
            &[],
            &HashSet::new(),
        );
        assert!(result.selectable());
    }

    #[test]
    fn test_own_pending_leave_fires_has_active_leave() {
        let l = leave("2024-06-14", LeaveStatus::Pending);
        let result = classify(
            d(2024, 6, 14),
            &window(),
            &policy_with(vec![]),
            None,
            &[&l],
            &HashSet::new(),
        );
        assert!(result.has(ReasonCode::HasActiveLeave));
        assert!(!result.has(ReasonCode::WeekAlreadyBooked));
    }

    #[test]
    fn test_rejected_leave_does_not_block_reapplication() {
        let l = leave("2024-06-14", LeaveStatus::Rejected);
        let result = classify(
            d(2024, 6, 14),
            &window(),
            &policy_with(vec![]),
            None,
            &[&l],
            &HashSet::new(),
        );
        assert!(result.selectable());
    }

    #[test]
    fn test_self_visit_exception() {
        // Alice's only active leave this week is on the 14th. The 14th itself
        // must not report WeekAlreadyBooked; any other day that week must.
        let leaves = vec![leave("2024-06-14", LeaveStatus::Approved)];
        let booked = compute_booked_weeks(&leaves, "alice");
        let refs: Vec<&Leave> = leaves.iter().collect();

        let own_day = classify(
            d(2024, 6, 14),
            &window(),
            &policy_with(vec![]),
            None,
            &refs,
            &booked,
        );
        assert!(own_day.has(ReasonCode::HasActiveLeave));
        assert!(!own_day.has(ReasonCode::WeekAlreadyBooked));

        let other_day = classify(
            d(2024, 6, 16),
            &window(),
            &policy_with(vec![]),
            None,
            &[],
            &booked,
        );
        assert!(other_day.has(ReasonCode::WeekAlreadyBooked));
    }

    #[test]
    fn test_reason_completeness_past_and_disabled() {
        // A past Sunday with weekends disabled must report both codes.
        let result = classify(
            d(2024, 6, 9),
            &window(),
            &policy_with(vec![0, 6]),
            None,
            &[],
            &HashSet::new(),
        );
        assert!(result.has(ReasonCode::Past));
        assert!(result.has(ReasonCode::DayDisabled));
        assert_eq!(result.reasons.len(), 2);
    }

    #[test]
    fn test_classify_is_idempotent() {
        let slots = DaySlots { available_slots: 0, total_slots: 5 };
        let booked: HashSet<NaiveDate> = [d(2024, 6, 10)].into_iter().collect();
        let policy = policy_with(vec![6]);
        let first = classify(d(2024, 6, 15), &window(), &policy, Some(&slots), &[], &booked);
        let second = classify(d(2024, 6, 15), &window(), &policy, Some(&slots), &[], &booked);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_window_day_reports_past_or_too_far() {
        // Thursday under OneWeek: lead time eats the whole window.
        let w = resolve_window(d(2024, 6, 13), WeekRange::OneWeek);
        assert!(w.is_empty());
        let result = classify(
            d(2024, 6, 15),
            &w,
            &policy_with(vec![]),
            None,
            &[],
            &HashSet::new(),
        );
        assert!(result.has(ReasonCode::Past) || result.has(ReasonCode::TooFar));
    }

    // ── shift-level checks ────────────────────────────────────────────────

    #[test]
    fn test_shift_offerable_with_open_slots() {
        assert!(shift_is_offerable(&detail("morning", 2)));
    }

    #[test]
    fn test_shift_not_offerable_when_full() {
        assert!(!shift_is_offerable(&detail("morning", 0)));
    }

    // ── can_submit ────────────────────────────────────────────────────────

    #[test]
    fn test_can_submit_ok() {
        let elig = EligibilityResult::default();
        let d = detail("morning", 1);
        assert!(can_submit(&elig, Some("morning"), Some(&d)).is_ok());
    }

    #[test]
    fn test_can_submit_rejects_unselectable_date() {
        let mut elig = EligibilityResult::default();
        elig.reasons.insert(ReasonCode::Past);
        let d = detail("morning", 1);
        assert_eq!(
            can_submit(&elig, Some("morning"), Some(&d)),
            Err(DenyReason::DateNotSelectable)
        );
    }

    #[test]
    fn test_can_submit_rejects_missing_shift() {
        let elig = EligibilityResult::default();
        assert_eq!(can_submit(&elig, None, None), Err(DenyReason::NoShiftChosen));
    }

    #[test]
    fn test_can_submit_rejects_full_shift() {
        let elig = EligibilityResult::default();
        let d = detail("morning", 0);
        assert_eq!(
            can_submit(&elig, Some("morning"), Some(&d)),
            Err(DenyReason::ShiftUnavailable)
        );
    }

    #[test]
    fn test_can_submit_rejects_unfetched_detail() {
        // Without the single-date detail the client cannot vouch for capacity.
        let elig = EligibilityResult::default();
        assert_eq!(
            can_submit(&elig, Some("morning"), None),
            Err(DenyReason::ShiftUnavailable)
        );
    }
}
