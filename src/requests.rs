use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response};

use crate::error::ScrapeError;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Fetches page bodies from the booking site.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn get_text(&self, url: &str) -> Result<String, ScrapeError>;

    /// Sends `fields` form-encoded and returns the response body.
    async fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<String, ScrapeError>;
}

#[derive(Debug, Clone)]
pub struct RequestClient {
    client: Client,
}

impl RequestClient {
    pub fn new() -> reqwest::Result<Self> {
        let client = ClientBuilder::new().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }

    async fn read_body(url: &str, response: Response) -> Result<String, ScrapeError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status,
            });
        }
        response.text().await.map_err(|source| ScrapeError::Transport {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl Fetch for RequestClient {
    async fn get_text(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ScrapeError::Transport {
                url: url.to_string(),
                source,
            })?;
        Self::read_body(url, response).await
    }

    async fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<String, ScrapeError> {
        let response = self
            .client
            .post(url)
            .form(fields)
            .send()
            .await
            .map_err(|source| ScrapeError::Transport {
                url: url.to_string(),
                source,
            })?;
        Self::read_body(url, response).await
    }
}
