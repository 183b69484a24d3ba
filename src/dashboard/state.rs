use crate::services::api::{
    AppsPayload,
    BookmarksPayload,
    ImprintPayload,
    SearchPayload,
    ThemesPayload,
};
use crate::services::{LoadResult, ResourceBundle, ResourceKind};
use serde::{Serialize, Serializer};

/// One resource's share of the dashboard state.
///
/// A slice either holds loaded data with no error, or the resource's default
/// payload together with an error message. The constructors are the only way
/// to build one, so no other combination exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slice<T> {
    #[serde(flatten)]
    payload: T,
    #[serde(serialize_with = "serialize_error_flag")]
    error: Option<String>,
}

impl<T: Default> Slice<T> {
    pub fn loaded(payload: T) -> Self {
        Self {
            payload,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            payload: T::default(),
            error: Some(message.into()),
        }
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl<T: Default> Default for Slice<T> {
    fn default() -> Self {
        Self::loaded(T::default())
    }
}

impl<T: Default> From<LoadResult<T>> for Slice<T> {
    fn from(result: LoadResult<T>) -> Self {
        match result {
            LoadResult::Loaded(payload) => Slice::loaded(payload),
            LoadResult::Failed(failure) => Slice::failed(failure.message()),
        }
    }
}

// `false` when there is no error, the message otherwise.
fn serialize_error_flag<S>(error: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match error {
        Some(message) => serializer.serialize_str(message),
        None => serializer.serialize_bool(false),
    }
}

/// Everything the rendering layer reads. `generation` counts applied load
/// cycles; `0` means nothing has been applied yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    pub generation: u64,
    pub app_data: Slice<AppsPayload>,
    pub bookmark_data: Slice<BookmarksPayload>,
    pub search_provider_data: Slice<SearchPayload>,
    pub theme_data: Slice<ThemesPayload>,
    pub imprint_data: Slice<ImprintPayload>,
}

impl DashboardState {
    pub fn from_bundle(bundle: ResourceBundle, generation: u64) -> Self {
        Self {
            generation,
            app_data: bundle.apps.into(),
            bookmark_data: bundle.bookmarks.into(),
            search_provider_data: bundle.search_providers.into(),
            theme_data: bundle.themes.into(),
            imprint_data: bundle.imprint.into(),
        }
    }

    pub fn error(&self, kind: ResourceKind) -> Option<&str> {
        match kind {
            ResourceKind::Apps => self.app_data.error(),
            ResourceKind::Bookmarks => self.bookmark_data.error(),
            ResourceKind::SearchProviders => self.search_provider_data.error(),
            ResourceKind::Themes => self.theme_data.error(),
            ResourceKind::Imprint => self.imprint_data.error(),
        }
    }

    pub fn failed_kinds(&self) -> Vec<ResourceKind> {
        ResourceKind::ALL
            .into_iter()
            .filter(|kind| self.error(*kind).is_some())
            .collect()
    }

    pub fn summary(&self) -> String {
        let apps = self.app_data.payload();
        let app_count = apps.apps.len()
            + apps
                .categories
                .iter()
                .map(|category| category.items.len())
                .sum::<usize>();
        let bookmark_count: usize = self
            .bookmark_data
            .payload()
            .groups
            .iter()
            .map(|group| group.items.len())
            .sum();

        let mut line = format!(
            "#{} apps: {} • bookmarks: {} • search providers: {} • themes: {}",
            self.generation,
            app_count,
            bookmark_count,
            self.search_provider_data.payload().providers.len(),
            self.theme_data.payload().themes.len()
        );
        let failed = self.failed_kinds();
        if !failed.is_empty() {
            let names: Vec<String> = failed.iter().map(|kind| kind.to_string()).collect();
            line.push_str(&format!(" • failed: {}", names.join(", ")));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::LOAD_FAILED_MESSAGE;
    use serde_json::json;

    #[test]
    fn failed_slice_carries_default_payload() {
        let slice: Slice<AppsPayload> = Slice::failed(LOAD_FAILED_MESSAGE);

        assert_eq!(slice.payload(), &AppsPayload::default());
        assert_eq!(slice.error(), Some(LOAD_FAILED_MESSAGE));
    }

    #[test]
    fn slices_serialize_payload_next_to_error_flag() {
        let failed: Slice<AppsPayload> = Slice::failed(LOAD_FAILED_MESSAGE);
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({ "categories": [], "apps": [], "error": "Failed to load data." })
        );

        let loaded = Slice::loaded(SearchPayload::default());
        assert_eq!(
            serde_json::to_value(&loaded).unwrap(),
            json!({ "providers": [], "error": false })
        );
    }

    #[test]
    fn initial_state_has_no_errors() {
        let state = DashboardState::default();

        assert_eq!(state.generation, 0);
        assert!(state.failed_kinds().is_empty());
        assert_eq!(state.imprint_data.payload(), &ImprintPayload::default());
    }

    #[test]
    fn state_serializes_with_camel_case_slices() {
        let value = serde_json::to_value(DashboardState::default()).unwrap();

        assert_eq!(value["themeData"], json!({ "themes": [], "error": false }));
        assert_eq!(value["imprintData"]["url"], json!({ "text": "", "link": "" }));
    }

    #[test]
    fn summary_lists_failed_resources() {
        let state = DashboardState {
            generation: 3,
            theme_data: Slice::failed(LOAD_FAILED_MESSAGE),
            ..DashboardState::default()
        };

        let summary = state.summary();
        assert!(summary.starts_with("#3 "));
        assert!(summary.ends_with("failed: themes"));
    }
}
