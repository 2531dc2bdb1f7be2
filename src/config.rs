use std::fs;
use std::path::Path;
use std::time::Duration;

use toml::{Table, Value};

use crate::error::ConfigError;

pub const DEFAULT_ADMIN_CHAT_ID: i64 = 56970700;
pub const DEFAULT_DATABASE_SPEC: &str = "sqlite://data/impfbot.db";
/// Twenty minutes.
pub const DEFAULT_CHECK_PERIOD: u64 = 20 * 60;
pub const DEFAULT_LOG_FORMAT: &str = "[{timestamp} - {level} - {target}]: {message}";

/// Bot settings, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub token: String,
    pub admin_chat_id: i64,
    pub database_spec: String,
    /// Seconds between polling passes.
    pub check_period: u64,
    pub log_format: String,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let table = text.parse::<Table>()?;

        let token = match table.get("token") {
            Some(value) => string_field("token", value)?,
            None => return Err(ConfigError::MissingField("token")),
        };
        let admin_chat_id = match table.get("admin_chat_id") {
            Some(value) => integer_field("admin_chat_id", value)?,
            None => DEFAULT_ADMIN_CHAT_ID,
        };
        let database_spec = match table.get("database_spec") {
            Some(value) => string_field("database_spec", value)?,
            None => DEFAULT_DATABASE_SPEC.to_string(),
        };
        let check_period = match table.get("check_period") {
            Some(value) => u64::try_from(integer_field("check_period", value)?).map_err(|_| {
                ConfigError::InvalidField {
                    field: "check_period",
                    expected: "a non-negative integer",
                }
            })?,
            None => DEFAULT_CHECK_PERIOD,
        };
        let log_format = match table.get("log_format") {
            Some(value) => string_field("log_format", value)?,
            None => DEFAULT_LOG_FORMAT.to_string(),
        };

        Ok(Config {
            token,
            admin_chat_id,
            database_spec,
            check_period,
            log_format,
        })
    }

    pub fn check_period(&self) -> Duration {
        Duration::from_secs(self.check_period)
    }
}

fn string_field(field: &'static str, value: &Value) -> Result<String, ConfigError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or(ConfigError::InvalidField {
            field,
            expected: "a string",
        })
}

fn integer_field(field: &'static str, value: &Value) -> Result<i64, ConfigError> {
    value.as_integer().ok_or(ConfigError::InvalidField {
        field,
        expected: "an integer",
    })
}
