use crate::data::{LeaveData, Persistable};
use anyhow::Result;

pub fn run() -> Result<()> {
    let leave_data = LeaveData::load_and_validate()?;
    write_leaves(&leave_data, &mut std::io::stdout())
}

pub(crate) fn write_leaves<W: std::io::Write>(data: &LeaveData, out: &mut W) -> Result<()> {
    writeln!(out, "Leave requests")?;
    writeln!(out, "---")?;
    writeln!(
        out,
        "  {:<8} {:<10} {:<12} {:<10} {:<10} {}",
        "#", "User", "Date", "Shift", "Status", "Reason"
    )?;
    for leave in &data.leaves {
        writeln!(
            out,
            "  {:<8} {:<10} {:<12} {:<10} {:<10} {}",
            leave.id,
            leave.user_id,
            leave.date,
            leave.shift_id,
            leave.status.label(),
            leave.reason.as_deref().unwrap_or("-")
        )?;
    }
    writeln!(out, "---")?;
    writeln!(out, "Total: {} request(s)", data.leaves.len())?;
    Ok(())
}
