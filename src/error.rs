use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("unexpected page structure: {0}")]
    Parse(String),
    #[error("malformed JSON in {what}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed date {value:?}")]
    Date {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

impl ScrapeError {
    pub(crate) fn parse(details: impl Into<String>) -> Self {
        ScrapeError::Parse(details.into())
    }

    /// The target site could not be reached or refused the request.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ScrapeError::Transport { .. } | ScrapeError::Status { .. }
        )
    }

    /// The target site answered, but not in the shape we expect.
    pub fn is_parse(&self) -> bool {
        !self.is_transport()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config file is not valid TOML")]
    Syntax(#[from] toml::de::Error),
    #[error("missing required config field `{0}`")]
    MissingField(&'static str),
    #[error("config field `{field}` must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}
