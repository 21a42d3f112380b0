use crate::calc::{
    classify, compute_booked_weeks, date_key, parse_date_key, resolve_window, shift_is_offerable,
};
use crate::data::{AppSettings, Leave, LeaveData, LeavePolicy, Persistable, SlotData};
use anyhow::Result;
use chrono::{Local, NaiveDate};

pub fn run(date: &str) -> Result<()> {
    let date = parse_date_key(date)?;
    let policy = LeavePolicy::load()?;
    let settings = AppSettings::load()?;
    let leave_data = LeaveData::load_and_validate()?;
    let slot_data = SlotData::load()?;
    let today = Local::now().date_naive();
    write_check(
        &mut std::io::stdout(),
        date,
        today,
        &policy,
        &settings,
        &leave_data,
        &slot_data,
    )
}

pub(crate) fn write_check<W: std::io::Write>(
    out: &mut W,
    date: NaiveDate,
    today: NaiveDate,
    policy: &LeavePolicy,
    settings: &AppSettings,
    leave_data: &LeaveData,
    slot_data: &SlotData,
) -> Result<()> {
    let window = resolve_window(today, policy.week_range);
    let booked_weeks = compute_booked_weeks(&leave_data.leaves, &settings.user_id);
    let by_date = leave_data.leaves_by_date(&settings.user_id);
    let key = date_key(date);
    let on_date: Vec<&Leave> = by_date.get(&key).cloned().unwrap_or_default();

    let eligibility = classify(
        date,
        &window,
        policy,
        slot_data.day(&key),
        &on_date,
        &booked_weeks,
    );

    writeln!(out, "Eligibility for {}", key)?;
    writeln!(
        out,
        "Booking window: [{} - {}] ({})",
        date_key(window.min_date),
        date_key(window.max_date),
        policy.week_range.label()
    )?;
    writeln!(out, "---")?;
    if eligibility.selectable() {
        writeln!(out, "Selectable: yes")?;
    } else {
        writeln!(out, "Selectable: no")?;
        for reason in &eligibility.reasons {
            writeln!(out, "  - {}", reason)?;
        }
    }

    writeln!(out, "---")?;
    match slot_data.detail(&key) {
        Some(details) => {
            writeln!(out, "Shifts:")?;
            for detail in details {
                let name = policy
                    .shift(&detail.shift_id)
                    .map(|s| s.name.as_str())
                    .unwrap_or(detail.shift_id.as_str());
                let verdict = if shift_is_offerable(detail) { "open" } else { "full" };
                writeln!(
                    out,
                    "  {:<12} {:>2} / {:<2}  {}",
                    name, detail.available_slots, detail.total_slots, verdict
                )?;
            }
        }
        None => writeln!(out, "No slot detail fetched for {}", key)?,
    }
    Ok(())
}
