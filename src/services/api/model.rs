use serde::{Deserialize, Serialize};

/// Body of `/data/apps.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppsPayload {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub apps: Vec<App>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub items: Vec<App>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct App {
    pub name: String,
    #[serde(rename = "displayURL")]
    pub display_url: String,
    pub url: String,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_tab: Option<bool>,
}

/// Body of `/data/bookmarks.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarksPayload {
    #[serde(default)]
    pub groups: Vec<BookmarkGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkGroup {
    pub name: String,
    #[serde(default)]
    pub items: Vec<Bookmark>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_tab: Option<bool>,
}

/// Body of `/data/search.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPayload {
    #[serde(default)]
    pub providers: Vec<SearchProvider>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchProvider {
    pub name: String,
    pub url: String,
    pub prefix: String,
}

/// Body of `/data/themes.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemesPayload {
    #[serde(default)]
    pub themes: Vec<Theme>,
}

impl ThemesPayload {
    pub fn find(&self, value: u32) -> Option<&Theme> {
        self.themes.iter().find(|theme| theme.value == value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub label: String,
    pub value: u32,
    pub main_color: String,
    pub accent_color: String,
    pub background_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            label: "Classic".to_string(),
            value: 0,
            main_color: "#000000".to_string(),
            accent_color: "#1e272e".to_string(),
            background_color: "#ffffff".to_string(),
        }
    }
}

/// Body of `/data/imprint.json`. The default value has every field empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImprintPayload {
    pub name: ImprintField,
    pub address: ImprintField,
    pub phone: ImprintField,
    pub email: ImprintField,
    pub url: ImprintField,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImprintField {
    pub text: String,
    pub link: String,
}
