pub mod api;
pub mod loader;
pub mod sources;
pub mod theme;

pub use loader::{LoadError, LoadFailure, LoadResult, ResourceBundle, ResourceLoader, LOAD_FAILED_MESSAGE};
pub use sources::{NetworkSource, PackagedSource, ResourceKind, ResourceSource};
pub use theme::{FileThemeStore, MemoryThemeStore, ThemeMode, ThemeStore, ThemeStoreError};
