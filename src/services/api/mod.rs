pub mod http;
pub mod model;

pub use http::{ApiClientConfig, ApiError, HttpClient};
pub use model::{
    App,
    AppsPayload,
    Bookmark,
    BookmarkGroup,
    BookmarksPayload,
    Category,
    ImprintField,
    ImprintPayload,
    SearchPayload,
    SearchProvider,
    Theme,
    ThemesPayload,
};
