use crate::data::persistence::Persistable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-day aggregate occupancy from the range snapshot. Advisory: used to
/// gray out full days in the calendar, re-verified per shift at submission.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DaySlots {
    pub available_slots: i32,
    pub total_slots: i32,
}

/// Per-shift occupancy from the single-date detail fetch. This is the
/// client-side authority for submission eligibility.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ShiftSlotDetail {
    pub shift_id: String,
    pub total_slots: i32,
    pub filled_slots: i32,
    pub available_slots: i32,
}

/// Locally cached slot-occupancy snapshots, keyed by date string. `days`
/// holds the coarse range snapshot, `details` the per-shift breakdown for
/// dates the user has opened.
#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct SlotData {
    #[serde(default)]
    pub days: HashMap<String, DaySlots>,
    #[serde(default)]
    pub details: HashMap<String, Vec<ShiftSlotDetail>>,
}

impl Persistable for SlotData {
    fn filename() -> &'static str {
        "slots.json"
    }
    fn is_json() -> bool {
        true
    }
}

impl SlotData {
    pub fn day(&self, date_key: &str) -> Option<&DaySlots> {
        self.days.get(date_key)
    }

    pub fn detail(&self, date_key: &str) -> Option<&[ShiftSlotDetail]> {
        self.details.get(date_key).map(Vec::as_slice)
    }

    pub fn shift_detail(&self, date_key: &str, shift_id: &str) -> Option<&ShiftSlotDetail> {
        self.details
            .get(date_key)?
            .iter()
            .find(|d| d.shift_id == shift_id)
    }

    /// Applies a local booking to the cached snapshot so the UI reflects a
    /// state at-or-after the write until the next sync refreshes it.
    pub fn apply_booking(&mut self, date_key: &str, shift_id: &str) {
        if let Some(day) = self.days.get_mut(date_key) {
            day.available_slots -= 1;
        }
        if let Some(detail) = self
            .details
            .get_mut(date_key)
            .and_then(|v| v.iter_mut().find(|d| d.shift_id == shift_id))
        {
            detail.available_slots -= 1;
            detail.filled_slots += 1;
        }
    }

    /// Reverses `apply_booking` when a local request is cancelled, clamped to
    /// the totals so a stale cache can never report more than full capacity.
    pub fn release_booking(&mut self, date_key: &str, shift_id: &str) {
        if let Some(day) = self.days.get_mut(date_key) {
            day.available_slots = (day.available_slots + 1).min(day.total_slots);
        }
        if let Some(detail) = self
            .details
            .get_mut(date_key)
            .and_then(|v| v.iter_mut().find(|d| d.shift_id == shift_id))
        {
            detail.available_slots = (detail.available_slots + 1).min(detail.total_slots);
            detail.filled_slots = (detail.filled_slots - 1).max(0);
        }
    }
}
