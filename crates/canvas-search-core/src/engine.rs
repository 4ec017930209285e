use std::time::Instant;

use canvas_data::math::NumberLocale;
use canvas_data::{Catalog, SearchResult};
use serde::Serialize;
use tracing::debug;

use crate::ranking::{rank_results, Candidate};
use crate::special::{
    compute_external_searches, compute_special_results, ExternalSearch, SpecialResult,
};
use crate::SearchConfig;

/// Runs a full search for one keystroke.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    config: SearchConfig,
    locale: NumberLocale,
    options: EngineOptions,
}

#[derive(Debug, Clone)]
struct EngineOptions {
    log_latency: bool,
}

#[derive(Debug, Clone)]
pub struct SearchEngineBuilder {
    config: SearchConfig,
    options: EngineOptions,
}

impl SearchEngineBuilder {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            options: EngineOptions { log_latency: true },
        }
    }

    #[must_use]
    pub fn log_latency(mut self, enabled: bool) -> Self {
        self.options.log_latency = enabled;
        self
    }

    pub fn build(self) -> SearchEngine {
        SearchEngine {
            locale: self.config.number_locale(),
            config: self.config,
            options: self.options,
        }
    }
}

/// Everything shown for a search term, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPage<'a> {
    pub term: String,
    pub special: Vec<SpecialResult>,
    pub results: Vec<Candidate<'a>>,
    pub external: Vec<ExternalSearch>,
}

impl SearchPage<'_> {
    pub fn len(&self) -> usize {
        self.special.len() + self.results.len() + self.external.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entries in the order they are displayed.
    pub fn entries(&self) -> impl Iterator<Item = &dyn SearchResult> + '_ {
        self.special
            .iter()
            .map(|result| result as &dyn SearchResult)
            .chain(self.results.iter().map(|result| result as &dyn SearchResult))
            .chain(self.external.iter().map(|result| result as &dyn SearchResult))
    }

    /// The entry opened when the user confirms the search.
    pub fn first(&self) -> Option<&dyn SearchResult> {
        self.entries().next()
    }
}

impl SearchEngine {
    pub fn builder(config: SearchConfig) -> SearchEngineBuilder {
        SearchEngineBuilder::new(config)
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn locale(&self) -> &NumberLocale {
        &self.locale
    }

    pub fn search<'a>(&self, term: &str, catalog: &'a Catalog) -> SearchPage<'a> {
        let started = Instant::now();
        let page = SearchPage {
            term: term.to_string(),
            special: compute_special_results(term, &self.locale),
            results: rank_results(term, self.config.settings.initial_results, catalog),
            external: compute_external_searches(term, &self.config.settings),
        };
        if self.options.log_latency {
            let latency_us = u64::try_from(started.elapsed().as_micros())
                .unwrap_or(u64::MAX);
            debug!(
                target: "canvas_search_core",
                term = %term,
                special = page.special.len(),
                results = page.results.len(),
                external = page.external.len(),
                latency_us,
                "search completed"
            );
        }
        page
    }
}
