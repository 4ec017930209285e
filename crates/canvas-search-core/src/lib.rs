//! Search over the launcher catalog: ranking, computed results and the
//! engine that combines them per keystroke.

use canvas_data::math::NumberLocale;
use canvas_data::Settings;
use serde::{Deserialize, Serialize};

pub mod engine;
pub mod ranking;
pub mod special;
pub mod strings;

pub use engine::{SearchEngine, SearchEngineBuilder, SearchPage};
pub use ranking::{rank_results, Candidate, Command};
pub use special::{
    compute_external_searches, compute_special_results, ExternalSearch, SearchProvider,
    SpecialResult,
};

/// Configuration inputs for a [`SearchEngine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub settings: Settings,
    /// Language tag selecting number separators, e.g. `en` or `de-CH`.
    pub locale: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            locale: "en".to_string(),
        }
    }
}

impl SearchConfig {
    pub fn number_locale(&self) -> NumberLocale {
        NumberLocale::from_tag(&self.locale)
    }
}
