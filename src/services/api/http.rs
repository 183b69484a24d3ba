use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    pub base_url: Url,
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl ApiClientConfig {
    pub fn try_from_url(url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(url)?;
        Ok(Self::new(base_url))
    }

    /// Paths are joined relative to `base_url`, so a base without a trailing
    /// slash gets one to keep its last segment.
    pub fn new(mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            base_url,
            timeout: Some(Duration::from_secs(15)),
            user_agent: format!("homedash/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// A zero duration disables the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }
}

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: ApiClientConfig,
}

impl HttpClient {
    pub fn new(config: ApiClientConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ApiError::Request)?;

        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.config
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(ApiError::from)
    }

    /// Fetches `path` and returns the raw body. Only a success status is
    /// accepted; the body is read in full either way so it can be reported.
    pub async fn get_text(&self, path: &str) -> Result<String, ApiError> {
        let url = self.url(path)?;
        let response = self.client.get(url).send().await.map_err(ApiError::Request)?;
        let status = response.status();
        let body = response.text().await.map_err(ApiError::Request)?;

        if !status.is_success() {
            return Err(ApiError::HttpStatus { status, body });
        }
        Ok(body)
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: StatusCode, body: String },
}
