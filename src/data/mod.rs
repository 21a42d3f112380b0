pub mod app_settings;
pub mod leave;
pub mod persistence;
pub mod policy;
pub mod slots;

pub use app_settings::AppSettings;
pub use leave::{Leave, LeaveData, LeaveStatus};
pub use persistence::Persistable;
pub use policy::{LeavePolicy, Shift};
pub use slots::{DaySlots, ShiftSlotDetail, SlotData};
