use crate::services::api::{ApiClientConfig, ApiError, HttpClient};
use async_trait::async_trait;
use std::fmt;

/// The five documents the dashboard is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Apps,
    Bookmarks,
    SearchProviders,
    Themes,
    Imprint,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Apps,
        ResourceKind::Bookmarks,
        ResourceKind::SearchProviders,
        ResourceKind::Themes,
        ResourceKind::Imprint,
    ];

    /// Well-known path of the document, relative to the dashboard root.
    pub fn path(self) -> &'static str {
        match self {
            ResourceKind::Apps => "/data/apps.json",
            ResourceKind::Bookmarks => "/data/bookmarks.json",
            ResourceKind::SearchProviders => "/data/search.json",
            ResourceKind::Themes => "/data/themes.json",
            ResourceKind::Imprint => "/data/imprint.json",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Apps => write!(f, "apps"),
            ResourceKind::Bookmarks => write!(f, "bookmarks"),
            ResourceKind::SearchProviders => write!(f, "search providers"),
            ResourceKind::Themes => write!(f, "themes"),
            ResourceKind::Imprint => write!(f, "imprint"),
        }
    }
}

/// Where raw resource documents come from. One source is picked per process
/// and handed to the loader; the loader owns decoding.
#[async_trait]
pub trait ResourceSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self, kind: ResourceKind) -> Result<String, ApiError>;
}

/// Fetches each document with a GET against the dashboard's base URL.
pub struct NetworkSource {
    http: HttpClient,
}

impl NetworkSource {
    pub fn new(config: ApiClientConfig) -> Result<Self, ApiError> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }
}

#[async_trait]
impl ResourceSource for NetworkSource {
    fn name(&self) -> &'static str {
        "network"
    }

    async fn fetch(&self, kind: ResourceKind) -> Result<String, ApiError> {
        log::debug!("GET {}{}", self.http.base_url(), kind.path().trim_start_matches('/'));
        self.http.get_text(kind.path()).await
    }
}

/// Serves the documents compiled into the binary from `data/`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PackagedSource;

impl PackagedSource {
    pub fn document(kind: ResourceKind) -> &'static str {
        match kind {
            ResourceKind::Apps => include_str!("../../data/apps.json"),
            ResourceKind::Bookmarks => include_str!("../../data/bookmarks.json"),
            ResourceKind::SearchProviders => include_str!("../../data/search.json"),
            ResourceKind::Themes => include_str!("../../data/themes.json"),
            ResourceKind::Imprint => include_str!("../../data/imprint.json"),
        }
    }
}

#[async_trait]
impl ResourceSource for PackagedSource {
    fn name(&self) -> &'static str {
        "packaged"
    }

    async fn fetch(&self, kind: ResourceKind) -> Result<String, ApiError> {
        Ok(Self::document(kind).to_string())
    }
}
