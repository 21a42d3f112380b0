use crate::data::LeavePolicy;
use anyhow::Result;

const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub fn run() -> Result<()> {
    let policy = LeavePolicy::load()?;
    write_shifts(&policy, &mut std::io::stdout())
}

pub(crate) fn write_shifts<W: std::io::Write>(policy: &LeavePolicy, out: &mut W) -> Result<()> {
    writeln!(out, "Shift configuration")?;
    writeln!(out, "---")?;
    writeln!(
        out,
        "  {:<12} {:<20} {:<8} {}",
        "Id", "Name", "Slots", "Hours"
    )?;
    for shift in &policy.shifts {
        let hours = match (&shift.start_time, &shift.end_time) {
            (Some(start), Some(end)) => format!("{} - {}", start, end),
            _ => "-".to_string(),
        };
        writeln!(
            out,
            "  {:<12} {:<20} {:<8} {}",
            shift.id, shift.name, shift.slots, hours
        )?;
    }
    writeln!(out, "---")?;
    let blackout: Vec<&str> = policy
        .disabled_days
        .iter()
        .filter(|&&d| d <= 6)
        .map(|&d| WEEKDAY_NAMES[d as usize])
        .collect();
    if blackout.is_empty() {
        writeln!(out, "Blackout days: none")?;
    } else {
        writeln!(out, "Blackout days: {}", blackout.join(", "))?;
    }
    writeln!(out, "Booking range: {}", policy.week_range.label())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::window::WeekRange;
    use crate::data::Shift;

    #[test]
    fn test_write_shifts_lists_capacity_and_hours() {
        let policy = LeavePolicy {
            disabled_days: vec![0, 6],
            week_range: WeekRange::OneMonth,
            shifts: vec![
                Shift::new("morning", "Morning", 3).with_times("08:00", "16:00"),
                Shift::new("evening", "Evening", 2),
            ],
        };
        let mut buf = Vec::new();
        write_shifts(&policy, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("Morning"));
        assert!(out.contains("08:00 - 16:00"));
        assert!(out.contains("Blackout days: Sun, Sat"));
        assert!(out.contains("Booking range: 1 month"));
    }

    #[test]
    fn test_write_shifts_no_blackout() {
        let policy = LeavePolicy {
            disabled_days: vec![],
            week_range: WeekRange::OneWeek,
            shifts: vec![],
        };
        let mut buf = Vec::new();
        write_shifts(&policy, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("Blackout days: none"));
    }
}
