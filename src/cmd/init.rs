use crate::calc::dates::date_key;
use crate::calc::window::resolve_window;
use crate::data::{
    AppSettings, DaySlots, LeaveData, LeavePolicy, Persistable, Shift, ShiftSlotDetail, SlotData,
};
use anyhow::Result;
use chrono::{Duration, Local, NaiveDate};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Combined struct for serializing config.yaml in one pass.
/// `SettingsWrapper` and `PolicyWrapper` both read config.yaml independently,
/// but writing them separately would overwrite each other, so we combine
/// them here.
#[derive(Serialize)]
struct ConfigFile {
    settings: AppSettings,
    policy: LeavePolicy,
}

/// Saves settings and policy to config.yaml together so neither key is lost.
pub(crate) fn save_config_to(
    settings: &AppSettings,
    policy: &LeavePolicy,
    dir: &Path,
) -> Result<()> {
    let config = ConfigFile {
        settings: settings.clone(),
        policy: policy.clone(),
    };
    let yaml = serde_norway::to_string(&config)?;
    fs::write(dir.join("config.yaml"), yaml)?;
    Ok(())
}

pub fn run() -> Result<()> {
    let dir = crate::data::persistence::get_data_dir()?;
    fs::create_dir_all(&dir)?;
    run_in_dir(&dir, Local::now().date_naive())?;
    println!("Data files initialized successfully.");
    Ok(())
}

/// Writes all default data files into `dir`. Exposed for unit testing.
pub(crate) fn run_in_dir(dir: &Path, today: NaiveDate) -> Result<()> {
    let settings = AppSettings::default();
    let policy = default_policy();
    save_config_to(&settings, &policy, dir)?;
    LeaveData::default().save_to(dir)?;
    sample_slots(&policy, today).save_to(dir)?;
    Ok(())
}

fn default_policy() -> LeavePolicy {
    LeavePolicy {
        disabled_days: vec![0, 6],
        week_range: crate::calc::window::WeekRange::TwoWeeks,
        shifts: vec![
            Shift::new("morning", "Morning", 3).with_times("08:00", "16:00"),
            Shift::new("evening", "Evening", 2).with_times("16:00", "00:00"),
        ],
    }
}

/// A fully open occupancy snapshot covering the widest booking window, so a
/// fresh data directory renders a usable calendar before the first real sync.
fn sample_slots(policy: &LeavePolicy, today: NaiveDate) -> SlotData {
    let window = resolve_window(today, crate::calc::window::WeekRange::OneMonth);
    let total: i32 = policy.shifts.iter().map(|s| s.slots as i32).sum();

    let mut slots = SlotData::default();
    let mut current = window.min_date;
    while current <= window.max_date {
        let key = date_key(current);
        slots.days.insert(
            key.clone(),
            DaySlots { available_slots: total, total_slots: total },
        );
        slots.details.insert(
            key,
            policy
                .shifts
                .iter()
                .map(|s| ShiftSlotDetail {
                    shift_id: s.id.clone(),
                    total_slots: s.slots as i32,
                    filled_slots: 0,
                    available_slots: s.slots as i32,
                })
                .collect(),
        );
        current += Duration::days(1);
    }
    slots
}
