use crate::calc::dates::{date_key, parse_date_key};
use crate::data::persistence::Persistable;
use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    /// Active leaves (pending or approved) block their day and week;
    /// rejected ones do not.
    pub fn is_active(self) -> bool {
        !matches!(self, LeaveStatus::Rejected)
    }

    pub fn label(self) -> &'static str {
        match self {
            LeaveStatus::Pending => "Pending",
            LeaveStatus::Approved => "Approved",
            LeaveStatus::Rejected => "Rejected",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Leave {
    pub id: String,
    pub user_id: String,
    /// Calendar date key, no time component.
    pub date: String,
    pub shift_id: String,
    pub status: LeaveStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Leave {
    pub fn new(
        id: &str,
        user_id: &str,
        date: NaiveDate,
        shift_id: &str,
        reason: Option<&str>,
    ) -> Self {
        Leave {
            id: id.to_string(),
            user_id: user_id.to_string(),
            date: date_key(date),
            shift_id: shift_id.to_string(),
            status: LeaveStatus::Pending,
            reason: reason.map(str::to_string),
            created_at: Utc::now().naive_utc(),
        }
    }
}

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct LeaveData {
    pub leaves: Vec<Leave>,
}

impl Persistable for LeaveData {
    fn filename() -> &'static str {
        "leaves.json"
    }
    fn is_json() -> bool {
        true
    }
}

impl LeaveData {
    /// Load and strictly re-parse every date key; a malformed record is a
    /// permanent error, never silently coerced.
    pub fn load_and_validate() -> Result<Self> {
        let data = Self::load()?;
        data.validate()?;
        Ok(data)
    }

    pub fn validate(&self) -> Result<()> {
        for leave in &self.leaves {
            parse_date_key(&leave.date)
                .with_context(|| format!("leave {} has an invalid date", leave.id))?;
        }
        Ok(())
    }

    pub fn add(&mut self, leave: Leave) {
        self.leaves.push(leave);
        self.leaves.sort_by(|a, b| a.date.cmp(&b.date));
    }

    pub fn get(&self, id: &str) -> Option<&Leave> {
        self.leaves.iter().find(|l| l.id == id)
    }

    /// Removes a leave, but only while it is still pending. Approved and
    /// rejected requests are part of the record and stay.
    pub fn cancel(&mut self, id: &str) -> bool {
        let before = self.leaves.len();
        self.leaves
            .retain(|l| !(l.id == id && l.status == LeaveStatus::Pending));
        self.leaves.len() < before
    }

    /// Admin decision on a pending request. Returns false when the leave is
    /// missing or already decided.
    pub fn decide(&mut self, id: &str, status: LeaveStatus) -> bool {
        match self.leaves.iter_mut().find(|l| l.id == id) {
            Some(leave) if leave.status == LeaveStatus::Pending => {
                leave.status = status;
                true
            }
            _ => false,
        }
    }

    pub fn for_user(&self, user_id: &str) -> Vec<&Leave> {
        self.leaves.iter().filter(|l| l.user_id == user_id).collect()
    }

    /// Date-key index of one user's leaves, rejected ones included; the
    /// classifier distinguishes them itself.
    pub fn leaves_by_date(&self, user_id: &str) -> HashMap<String, Vec<&Leave>> {
        let mut map: HashMap<String, Vec<&Leave>> = HashMap::new();
        for leave in self.leaves.iter().filter(|l| l.user_id == user_id) {
            map.entry(leave.date.clone()).or_default().push(leave);
        }
        map
    }

    /// Next request id in the local `lv-N` sequence.
    pub fn next_id(&self) -> String {
        let max = self
            .leaves
            .iter()
            .filter_map(|l| l.id.strip_prefix("lv-"))
            .filter_map(|n| n.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("lv-{}", max + 1)
    }
}
