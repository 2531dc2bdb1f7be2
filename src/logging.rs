use std::io::Write;
use std::sync::LazyLock;

use chrono::Local;
use env_logger::Env;
use log::{Level, SetLoggerError};
use regex::{Captures, Regex};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("placeholder regex is valid"));

/// Fills `{timestamp}`, `{level}`, `{target}` and `{message}` in `template`.
/// Unknown placeholders are left as they are.
pub fn render_log_line(
    template: &str,
    timestamp: &str,
    level: Level,
    target: &str,
    message: &str,
) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match &caps[1] {
            "timestamp" => timestamp.to_string(),
            "level" => level.to_string(),
            "target" => target.to_string(),
            "message" => message.to_string(),
            _ => caps[0].to_string(),
        })
        .into_owned()
}

pub fn init_logging(log_format: &str) -> Result<(), SetLoggerError> {
    let template = log_format.to_string();
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(move |buf, record| {
            let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
            let line = render_log_line(
                &template,
                &timestamp,
                record.level(),
                record.target(),
                &record.args().to_string(),
            );
            writeln!(buf, "{line}")
        })
        .try_init()
}
