//! Computed results shown ahead of catalog matches and the external searches
//! appended after them.

use canvas_data::math::{
    parse_arithmetic_with, parse_metronome, parse_unit_conversion_with, Metronome, NumberLocale,
    ParseResult,
};
use canvas_data::{SearchResult, Settings, Uid};
use once_cell::sync::Lazy;
use serde::Serialize;
use url::Url;

static OPEN_URL_UID: Lazy<Uid> = Lazy::new(|| Uid::new("special/open_url"));
static MATH_UID: Lazy<Uid> = Lazy::new(|| Uid::new("special/math"));
static UNITS_UID: Lazy<Uid> = Lazy::new(|| Uid::new("special/units"));
static METRONOME_UID: Lazy<Uid> = Lazy::new(|| Uid::new("special/metronome"));
static WEB_SEARCH_UID: Lazy<Uid> = Lazy::new(|| Uid::new("search/web"));
static WIKIPEDIA_SEARCH_UID: Lazy<Uid> = Lazy::new(|| Uid::new("search/wikipedia"));
static APP_STORE_SEARCH_UID: Lazy<Uid> = Lazy::new(|| Uid::new("search/app_store"));

const WIKIPEDIA_SEARCH_URL: &str = "https://en.wikipedia.org/wiki/Special:Search";
const APP_STORE_SEARCH_URL: &str = "market://search";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpecialResult {
    OpenUrl { url: Url },
    Math { result: ParseResult },
    UnitConversion { result: ParseResult },
    Metronome { metronome: Metronome },
}

impl SearchResult for SpecialResult {
    fn uid(&self) -> &Uid {
        match self {
            SpecialResult::OpenUrl { .. } => &OPEN_URL_UID,
            SpecialResult::Math { .. } => &MATH_UID,
            SpecialResult::UnitConversion { .. } => &UNITS_UID,
            SpecialResult::Metronome { .. } => &METRONOME_UID,
        }
    }

    fn search_tokens(&self) -> &[String] {
        &[]
    }

    fn is_error(&self) -> bool {
        match self {
            SpecialResult::Math { result } | SpecialResult::UnitConversion { result } => {
                !result.successful
            }
            SpecialResult::OpenUrl { .. } | SpecialResult::Metronome { .. } => false,
        }
    }
}

/// Special and external results are suppressed for empty terms, commands and
/// tag searches.
pub fn hides_special_results(term: &str) -> bool {
    term.is_empty() || term.starts_with('/') || term.starts_with('#')
}

/// Runs every parser on `term`, in display order.
pub fn compute_special_results(term: &str, locale: &NumberLocale) -> Vec<SpecialResult> {
    if hides_special_results(term) {
        return Vec::new();
    }

    let mut results = Vec::new();
    if let Some(url) = parse_web_url(term) {
        results.push(SpecialResult::OpenUrl { url });
    }
    // "e" and "inf" are common search terms, not calculations.
    if !term.eq_ignore_ascii_case("e") && !term.eq_ignore_ascii_case("inf") {
        if let Some(result) = parse_arithmetic_with(term, locale) {
            results.push(SpecialResult::Math { result });
        }
    }
    if let Some(result) = parse_unit_conversion_with(term, locale) {
        results.push(SpecialResult::UnitConversion { result });
    }
    if let Some(metronome) = parse_metronome(term) {
        results.push(SpecialResult::Metronome { metronome });
    }
    results
}

/// Accepts absolute `http` and `https` URLs only.
pub fn parse_web_url(term: &str) -> Option<Url> {
    let url = Url::parse(term).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchProvider {
    /// Handled by whatever web search the platform offers.
    Web,
    Wikipedia,
    AppStore,
}

impl SearchProvider {
    pub fn all() -> &'static [SearchProvider] {
        &[
            SearchProvider::Web,
            SearchProvider::Wikipedia,
            SearchProvider::AppStore,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalSearch {
    pub provider: SearchProvider,
    pub term: String,
}

impl ExternalSearch {
    pub fn new(provider: SearchProvider, term: &str) -> Self {
        Self {
            provider,
            term: term.to_string(),
        }
    }

    /// Address to open for this search; `None` for the platform web search.
    pub fn url(&self) -> Option<Url> {
        let (base, parameter) = match self.provider {
            SearchProvider::Web => return None,
            SearchProvider::Wikipedia => (WIKIPEDIA_SEARCH_URL, "search"),
            SearchProvider::AppStore => (APP_STORE_SEARCH_URL, "q"),
        };
        let query = [(parameter, self.term.as_str())];
        Url::parse_with_params(base, &query).ok()
    }
}

impl SearchResult for ExternalSearch {
    fn uid(&self) -> &Uid {
        match self.provider {
            SearchProvider::Web => &WEB_SEARCH_UID,
            SearchProvider::Wikipedia => &WIKIPEDIA_SEARCH_UID,
            SearchProvider::AppStore => &APP_STORE_SEARCH_UID,
        }
    }

    fn search_tokens(&self) -> &[String] {
        &[]
    }
}

pub fn compute_external_searches(term: &str, settings: &Settings) -> Vec<ExternalSearch> {
    if hides_special_results(term) {
        return Vec::new();
    }
    SearchProvider::all()
        .iter()
        .filter(|provider| {
            **provider != SearchProvider::AppStore || settings.app_store_search_enabled
        })
        .map(|provider| ExternalSearch::new(*provider, term))
        .collect()
}
