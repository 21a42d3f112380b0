use crate::data::{
    persistence::get_data_dir, AppSettings, LeaveData, LeavePolicy, Persistable, SlotData,
};
use crate::ui::calendar_view::{run_app, App};
use crate::ui::{restore_terminal, setup_terminal};
use anyhow::Result;
use chrono::Local;

pub fn run() -> Result<()> {
    let mut policy = LeavePolicy::load()?;
    let settings = AppSettings::load()?;
    let mut leave_data = LeaveData::load_and_validate()?;
    let mut slot_data = SlotData::load()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen
        );
        original_hook(info);
    }));

    let mut terminal = setup_terminal()?;

    let today = Local::now().date_naive();
    let data_dir = get_data_dir().unwrap_or_else(|_| std::path::PathBuf::from("./config"));
    let mut app = App::new(
        &mut policy,
        &mut leave_data,
        &mut slot_data,
        settings,
        today,
        data_dir.clone(),
    );

    let result = run_app(&mut terminal, &mut app);

    restore_terminal(&mut terminal)?;

    // Extract settings before dropping app (which holds borrows on the data fields)
    let final_settings = app.settings.clone();
    drop(app);

    // Save all modified data
    leave_data.save()?;
    slot_data.save()?;
    crate::cmd::init::save_config_to(&final_settings, &policy, &data_dir)?;

    result
}
