use crate::calc::window::WeekRange;
use crate::data::persistence::Persistable;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A bookable shift with a per-day capacity. Capacity is unsigned, so the
/// non-negative invariant holds by construction; day-specific occupancy
/// snapshots override it for rendering and submission checks.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Shift {
    pub id: String,
    pub name: String,
    pub slots: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

impl Shift {
    pub fn new(id: &str, name: &str, slots: u32) -> Self {
        Shift {
            id: id.to_string(),
            name: name.to_string(),
            slots,
            start_time: None,
            end_time: None,
        }
    }

    pub fn with_times(mut self, start: &str, end: &str) -> Self {
        self.start_time = Some(start.to_string());
        self.end_time = Some(end.to_string());
        self
    }
}

/// Admin-configured booking rules, fetched once per session and treated as an
/// immutable snapshot for the duration of a render cycle.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct LeavePolicy {
    /// Weekday indices (0=Sunday..6=Saturday) globally blocked for leave.
    #[serde(default)]
    pub disabled_days: Vec<u8>,
    #[serde(default)]
    pub week_range: WeekRange,
    #[serde(default)]
    pub shifts: Vec<Shift>,
}

impl LeavePolicy {
    /// Shift ids must be unique and blackout indices must be real weekdays.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for shift in &self.shifts {
            if !seen.insert(shift.id.as_str()) {
                bail!("duplicate shift id '{}' in policy", shift.id);
            }
        }
        for &day in &self.disabled_days {
            if day > 6 {
                bail!("disabled day index {} out of range 0..=6", day);
            }
        }
        Ok(())
    }

    pub fn day_disabled(&self, weekday: u8) -> bool {
        self.disabled_days.contains(&weekday)
    }

    pub fn shift(&self, id: &str) -> Option<&Shift> {
        self.shifts.iter().find(|s| s.id == id)
    }

    /// Toggle a weekday in the blackout set, keeping the list sorted.
    pub fn toggle_disabled_day(&mut self, weekday: u8) {
        if let Some(pos) = self.disabled_days.iter().position(|&d| d == weekday) {
            self.disabled_days.remove(pos);
        } else {
            self.disabled_days.push(weekday);
            self.disabled_days.sort_unstable();
        }
    }

    pub fn load() -> Result<Self> {
        let policy = PolicyWrapper::load()?.policy;
        policy.validate()?;
        Ok(policy)
    }

    pub fn load_from(dir: &Path) -> Result<Self> {
        let policy = PolicyWrapper::load_from(dir)?.policy;
        policy.validate()?;
        Ok(policy)
    }
}

/// Wrapper that reads the `policy` key from config.yaml. `SettingsWrapper`
/// reads the same file for its `settings` key; both work independently
/// because serde ignores unknown fields by default.
#[derive(Serialize, Deserialize, Default, Debug)]
struct PolicyWrapper {
    #[serde(default)]
    policy: LeavePolicy,
}

impl Persistable for PolicyWrapper {
    fn filename() -> &'static str {
        "config.yaml"
    }
    fn is_json() -> bool {
        false
    }
}
