use std::env;
use std::path::PathBuf;

pub const DEFAULT_SUBJECT_UUID: &str = "ed4ab730-f132-4511-95c8-d03408d09781";
pub const DEFAULT_STATUS_URL: &str = "https://api.hypixel.net/v2/status";

/// Environment configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub subject_uuid: String,
    pub status_url: String,
    pub db_path: PathBuf,
    pub log_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let api_key =
            optional_env("HYPIXEL_KEY").ok_or_else(|| "HYPIXEL_KEY not set".to_string())?;
        let subject_uuid =
            optional_env("HYTRACK_UUID").unwrap_or_else(|| DEFAULT_SUBJECT_UUID.to_string());
        let status_url =
            optional_env("HYTRACK_STATUS_URL").unwrap_or_else(|| DEFAULT_STATUS_URL.to_string());
        let db_path = match optional_env("HYTRACK_DB_PATH") {
            Some(value) => PathBuf::from(value),
            None => default_data_path("sessions.db")?,
        };
        let log_path = match optional_env("HYTRACK_LOG_PATH") {
            Some(value) => PathBuf::from(value),
            None => default_data_path("sessions.log")?,
        };

        Ok(Self {
            api_key,
            subject_uuid,
            status_url,
            db_path,
            log_path,
        })
    }
}

// Set-but-empty counts as unset.
fn optional_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn default_data_path(file_name: &str) -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or_else(|| "Home directory not found".to_string())?;
    Ok(home.join(".hytrack").join(file_name))
}
