use crate::config::{AppConfig, LoadStrategy};
use crate::services::api::{
    ApiError,
    AppsPayload,
    BookmarksPayload,
    ImprintPayload,
    SearchPayload,
    ThemesPayload,
};
use crate::services::sources::{NetworkSource, PackagedSource, ResourceKind, ResourceSource};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;

/// The only error text a slice ever carries. Causes go to the log.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load data.";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("failed to decode document: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct LoadFailure {
    kind: ResourceKind,
    cause: LoadError,
}

impl LoadFailure {
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn cause(&self) -> &LoadError {
        &self.cause
    }

    pub fn message(&self) -> &'static str {
        LOAD_FAILED_MESSAGE
    }
}

/// Outcome of loading a single resource.
#[derive(Debug)]
pub enum LoadResult<T> {
    Loaded(T),
    Failed(LoadFailure),
}

impl<T> LoadResult<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadResult::Loaded(_))
    }

    pub fn failure(&self) -> Option<&LoadFailure> {
        match self {
            LoadResult::Loaded(_) => None,
            LoadResult::Failed(failure) => Some(failure),
        }
    }
}

/// One load cycle: every resource has settled, successfully or not.
#[derive(Debug)]
pub struct ResourceBundle {
    pub apps: LoadResult<AppsPayload>,
    pub bookmarks: LoadResult<BookmarksPayload>,
    pub search_providers: LoadResult<SearchPayload>,
    pub themes: LoadResult<ThemesPayload>,
    pub imprint: LoadResult<ImprintPayload>,
}

impl ResourceBundle {
    pub fn failed_kinds(&self) -> Vec<ResourceKind> {
        [
            self.apps.failure(),
            self.bookmarks.failure(),
            self.search_providers.failure(),
            self.themes.failure(),
            self.imprint.failure(),
        ]
        .into_iter()
        .flatten()
        .map(LoadFailure::kind)
        .collect()
    }
}

#[derive(Clone)]
pub struct ResourceLoader {
    source: Arc<dyn ResourceSource>,
}

impl ResourceLoader {
    pub fn new(source: Arc<dyn ResourceSource>) -> Self {
        Self { source }
    }

    pub fn packaged() -> Self {
        Self::new(Arc::new(PackagedSource))
    }

    /// Picks the source for the configured strategy. Called once at startup.
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        let loader = match config.strategy {
            LoadStrategy::Packaged => Self::packaged(),
            LoadStrategy::Network => {
                let client_config = config.api_client_config()?;
                Self::new(Arc::new(NetworkSource::new(client_config)?))
            }
        };
        log::info!("Loading dashboard data from {} source", loader.source_name());
        Ok(loader)
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Loads all five resources concurrently and waits for every one of them
    /// to settle. Never fails as a whole; failures are carried per resource.
    pub async fn load(&self) -> ResourceBundle {
        let (apps, bookmarks, search_providers, themes, imprint) = tokio::join!(
            self.load_one(ResourceKind::Apps),
            self.load_one(ResourceKind::Bookmarks),
            self.load_one(ResourceKind::SearchProviders),
            self.load_one(ResourceKind::Themes),
            self.load_one(ResourceKind::Imprint),
        );

        let bundle = ResourceBundle {
            apps,
            bookmarks,
            search_providers,
            themes,
            imprint,
        };
        let failed = bundle.failed_kinds();
        if failed.is_empty() {
            log::debug!("All resources loaded from {} source", self.source_name());
        } else {
            log::debug!(
                "{} of {} resources failed to load from {} source",
                failed.len(),
                ResourceKind::ALL.len(),
                self.source_name()
            );
        }
        bundle
    }

    async fn load_one<T>(&self, kind: ResourceKind) -> LoadResult<T>
    where
        T: DeserializeOwned,
    {
        match self.fetch_document(kind).await {
            Ok(payload) => LoadResult::Loaded(payload),
            Err(cause) => {
                log::warn!("Failed to load {kind} ({}): {cause}", kind.path());
                LoadResult::Failed(LoadFailure { kind, cause })
            }
        }
    }

    async fn fetch_document<T>(&self, kind: ResourceKind) -> Result<T, LoadError>
    where
        T: DeserializeOwned,
    {
        let body = self.source.fetch(kind).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::api::ApiClientConfig;
    use crate::services::sources::testing::ScriptedSource;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    fn network_loader(server: &MockServer) -> ResourceLoader {
        let config = ApiClientConfig::try_from_url(&server.url("/")).unwrap();
        ResourceLoader::new(Arc::new(NetworkSource::new(config).unwrap()))
    }

    fn mock_document(server: &MockServer, kind: ResourceKind, body: serde_json::Value) {
        server.mock(|when, then| {
            when.method(GET).path(kind.path());
            then.status(200).json_body(body);
        });
    }

    fn mock_all_but(server: &MockServer, skip: ResourceKind) {
        for kind in ResourceKind::ALL {
            if kind != skip {
                let body: serde_json::Value =
                    serde_json::from_str(PackagedSource::document(kind)).unwrap();
                mock_document(server, kind, body);
            }
        }
    }

    #[tokio::test]
    async fn packaged_loader_loads_every_resource() {
        let bundle = ResourceLoader::packaged().load().await;

        assert!(bundle.failed_kinds().is_empty());
        match bundle.themes {
            LoadResult::Loaded(themes) => assert_eq!(themes.themes[0].label, "Classic"),
            LoadResult::Failed(failure) => panic!("themes failed: {}", failure.cause()),
        }
    }

    #[tokio::test]
    async fn loads_all_documents_over_http() {
        let server = MockServer::start();
        mock_document(
            &server,
            ResourceKind::Apps,
            json!({
                "categories": [],
                "apps": [{
                    "name": "NAS",
                    "displayURL": "nas.lan",
                    "url": "https://nas.lan",
                    "icon": "storage"
                }]
            }),
        );
        mock_all_but(&server, ResourceKind::Apps);

        let bundle = network_loader(&server).load().await;

        assert!(bundle.failed_kinds().is_empty());
        match bundle.apps {
            LoadResult::Loaded(apps) => assert_eq!(apps.apps[0].name, "NAS"),
            LoadResult::Failed(failure) => panic!("apps failed: {}", failure.cause()),
        }
    }

    #[tokio::test]
    async fn server_error_fails_only_that_resource() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/data/apps.json");
            then.status(500).body("boom");
        });
        mock_all_but(&server, ResourceKind::Apps);

        let bundle = network_loader(&server).load().await;

        assert_eq!(bundle.failed_kinds(), vec![ResourceKind::Apps]);
        let failure = bundle.apps.failure().unwrap();
        assert_eq!(failure.message(), LOAD_FAILED_MESSAGE);
        assert!(matches!(
            failure.cause(),
            LoadError::Api(ApiError::HttpStatus { .. })
        ));
        assert!(bundle.themes.is_loaded());
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/data/themes.json");
            then.status(200).body("{ themes: [");
        });
        mock_all_but(&server, ResourceKind::Themes);

        let bundle = network_loader(&server).load().await;

        assert_eq!(bundle.failed_kinds(), vec![ResourceKind::Themes]);
        assert!(matches!(
            bundle.themes.failure().map(LoadFailure::cause),
            Some(LoadError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_server_fails_every_resource() {
        let config = ApiClientConfig::try_from_url("http://127.0.0.1:9/").unwrap();
        let loader = ResourceLoader::new(Arc::new(NetworkSource::new(config).unwrap()));

        let bundle = loader.load().await;

        assert_eq!(bundle.failed_kinds(), ResourceKind::ALL.to_vec());
    }

    #[tokio::test]
    async fn failures_stay_with_their_resource() {
        for mask in 0u8..32 {
            let failing: Vec<_> = ResourceKind::ALL
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << bit) != 0)
                .map(|(_, kind)| *kind)
                .collect();
            let loader = ResourceLoader::new(Arc::new(ScriptedSource::failing(failing.clone())));

            let bundle = loader.load().await;

            assert_eq!(bundle.failed_kinds(), failing, "mask {mask:05b}");
        }
    }

    #[tokio::test]
    async fn timed_out_request_fails_only_that_resource() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/data/bookmarks.json");
            then.status(200)
                .delay(Duration::from_secs(3))
                .body(PackagedSource::document(ResourceKind::Bookmarks));
        });
        mock_all_but(&server, ResourceKind::Bookmarks);

        let config = ApiClientConfig::try_from_url(&server.url("/"))
            .unwrap()
            .with_timeout(Duration::from_millis(300));
        let loader = ResourceLoader::new(Arc::new(NetworkSource::new(config).unwrap()));

        let bundle = loader.load().await;

        assert_eq!(bundle.failed_kinds(), vec![ResourceKind::Bookmarks]);
        match bundle.bookmarks.failure().map(LoadFailure::cause) {
            Some(LoadError::Api(ApiError::Request(err))) => assert!(err.is_timeout()),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(bundle.apps.is_loaded());
        assert!(bundle.search_providers.is_loaded());
        assert!(bundle.themes.is_loaded());
        assert!(bundle.imprint.is_loaded());
    }

    #[test]
    fn config_selects_packaged_source() {
        let config = AppConfig {
            strategy: LoadStrategy::Packaged,
            base_url: "not a url".to_string(),
            ..AppConfig::default()
        };

        let loader = ResourceLoader::from_config(&config).unwrap();
        assert_eq!(loader.source_name(), "packaged");
    }

    #[test]
    fn config_selects_network_source() {
        let config = AppConfig {
            strategy: LoadStrategy::Network,
            base_url: "http://dash.lan/".to_string(),
            ..AppConfig::default()
        };

        let loader = ResourceLoader::from_config(&config).unwrap();
        assert_eq!(loader.source_name(), "network");
    }

    #[test]
    fn network_strategy_rejects_invalid_base_url() {
        let config = AppConfig {
            strategy: LoadStrategy::Network,
            base_url: "not a url".to_string(),
            ..AppConfig::default()
        };

        assert!(matches!(
            ResourceLoader::from_config(&config).err(),
            Some(ApiError::Url(_))
        ));
    }
}
