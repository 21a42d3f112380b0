use crate::data::persistence::Persistable;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Session and presentation preferences. Loaded once at startup and passed by
/// reference to the app shell; never read ambiently from components.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    pub user_id: String,
    pub admin: bool,
    pub theme: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            user_id: "me".to_string(),
            admin: false,
            theme: "dark".to_string(),
        }
    }
}

/// Wrapper that reads the `settings` key from config.yaml.
/// `PolicyWrapper` reads the same file for its `policy` key; both work
/// independently because serde ignores unknown fields by default.
#[derive(Serialize, Deserialize, Default, Debug)]
struct SettingsWrapper {
    #[serde(default)]
    settings: AppSettings,
}

impl Persistable for SettingsWrapper {
    fn filename() -> &'static str {
        "config.yaml"
    }
    fn is_json() -> bool {
        false
    }
}

impl AppSettings {
    pub fn load() -> Result<Self> {
        Ok(SettingsWrapper::load()?.settings)
    }
}
