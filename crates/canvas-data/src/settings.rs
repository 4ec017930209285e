use std::fmt;

use serde::{Deserialize, Serialize};

/// What to show while the search field is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialResults {
    Favorites,
    #[default]
    AllApps,
    Nothing,
}

impl InitialResults {
    pub fn all() -> &'static [InitialResults] {
        &[
            InitialResults::Favorites,
            InitialResults::AllApps,
            InitialResults::Nothing,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InitialResults::Favorites => "favorites",
            InitialResults::AllApps => "all_apps",
            InitialResults::Nothing => "nothing",
        }
    }

    /// Parses a setting value (case-insensitive, `-` and `_` interchangeable).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "favorites" | "favourites" | "starred" => Some(InitialResults::Favorites),
            "all_apps" | "allapps" | "apps" | "all" => Some(InitialResults::AllApps),
            "nothing" | "none" | "empty" => Some(InitialResults::Nothing),
            _ => None,
        }
    }
}

impl fmt::Display for InitialResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User preferences that influence search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub initial_results: InitialResults,
    pub contact_search_enabled: bool,
    pub calendar_search_enabled: bool,
    /// Hide dynamic and cached shortcuts named like a contact.
    pub hide_contact_shortcuts: bool,
    pub app_store_search_enabled: bool,
    pub sort_results_by_usage: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            initial_results: InitialResults::default(),
            contact_search_enabled: true,
            calendar_search_enabled: false,
            hide_contact_shortcuts: true,
            app_store_search_enabled: true,
            sort_results_by_usage: true,
        }
    }
}
