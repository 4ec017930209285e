//! Orders catalog candidates for a search term.
//!
//! Categories are never interleaved: activities come first, then pinned,
//! static, dynamic and cached shortcuts, contacts and calendar events. Within
//! a category every sort is stable, so the catalog order breaks remaining
//! ties.

use canvas_data::{
    compare_labels, Activity, CalendarEvent, Catalog, Contact, InitialResults, Labeled,
    SearchResult, Shortcut, Tag, Uid,
};
use serde::Serialize;
use tracing::debug;

/// A borrowed catalog entry in a ranked result list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", content = "item", rename_all = "snake_case")]
pub enum Candidate<'a> {
    Activity(&'a Activity),
    Shortcut(&'a Shortcut),
    Contact(&'a Contact),
    CalendarEvent(&'a CalendarEvent),
}

impl<'a> Candidate<'a> {
    fn inner(&self) -> &'a dyn Labeled {
        match *self {
            Candidate::Activity(activity) => activity,
            Candidate::Shortcut(shortcut) => shortcut,
            Candidate::Contact(contact) => contact,
            Candidate::CalendarEvent(event) => event,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Candidate::Activity(_) => "activity",
            Candidate::Shortcut(_) => "shortcut",
            Candidate::Contact(_) => "contact",
            Candidate::CalendarEvent(_) => "calendar",
        }
    }
}

impl SearchResult for Candidate<'_> {
    fn uid(&self) -> &Uid {
        self.inner().uid()
    }

    fn search_tokens(&self) -> &[String] {
        self.inner().search_tokens()
    }

    fn tags(&self) -> &[Tag] {
        self.inner().tags()
    }

    fn is_favorite(&self) -> bool {
        self.inner().is_favorite()
    }

    fn times_opened(&self) -> i64 {
        self.inner().times_opened()
    }
}

impl Labeled for Candidate<'_> {
    fn label(&self) -> &str {
        self.inner().label()
    }
}

impl<'a> From<&'a Activity> for Candidate<'a> {
    fn from(activity: &'a Activity) -> Self {
        Candidate::Activity(activity)
    }
}

impl<'a> From<&'a Shortcut> for Candidate<'a> {
    fn from(shortcut: &'a Shortcut) -> Self {
        Candidate::Shortcut(shortcut)
    }
}

impl<'a> From<&'a Contact> for Candidate<'a> {
    fn from(contact: &'a Contact) -> Self {
        Candidate::Contact(contact)
    }
}

impl<'a> From<&'a CalendarEvent> for Candidate<'a> {
    fn from(event: &'a CalendarEvent) -> Self {
        Candidate::CalendarEvent(event)
    }
}

/// Commands that list a fixed set of categories without filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    All,
    Shortcuts,
    Static,
    Dynamic,
    Pinned,
    Cached,
    Contacts,
    Calendar,
}

impl Command {
    pub fn all() -> &'static [Command] {
        &[
            Command::All,
            Command::Shortcuts,
            Command::Static,
            Command::Dynamic,
            Command::Pinned,
            Command::Cached,
            Command::Contacts,
            Command::Calendar,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::All => "/all",
            Command::Shortcuts => "/shortcuts",
            Command::Static => "/static",
            Command::Dynamic => "/dynamic",
            Command::Pinned => "/pinned",
            Command::Cached => "/cached",
            Command::Contacts => "/contacts",
            Command::Calendar => "/calendar",
        }
    }

    /// Exact, case-sensitive match of the whole search term.
    pub fn parse(term: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|command| command.as_str() == term)
    }

    fn list<'a>(&self, catalog: &'a Catalog) -> Vec<Candidate<'a>> {
        let mut results = Vec::new();
        match self {
            Command::All => {
                extend(&mut results, &catalog.activities);
                extend_shortcuts(&mut results, catalog);
                extend(&mut results, &catalog.contacts);
            }
            Command::Shortcuts => extend_shortcuts(&mut results, catalog),
            Command::Static => extend(&mut results, &catalog.static_shortcuts),
            Command::Dynamic => extend(&mut results, &catalog.dynamic_shortcuts),
            Command::Pinned => extend(&mut results, &catalog.pinned_shortcuts),
            Command::Cached => extend(&mut results, &catalog.cached_shortcuts),
            Command::Contacts => extend(&mut results, &catalog.contacts),
            Command::Calendar => extend(&mut results, &catalog.calendar),
        }
        results
    }
}

fn extend<'a, T>(results: &mut Vec<Candidate<'a>>, items: &'a [T])
where
    &'a T: Into<Candidate<'a>>,
{
    results.extend(items.iter().map(Into::into));
}

fn extend_shortcuts<'a>(results: &mut Vec<Candidate<'a>>, catalog: &'a Catalog) {
    extend(results, &catalog.pinned_shortcuts);
    extend(results, &catalog.static_shortcuts);
    extend(results, &catalog.dynamic_shortcuts);
    extend(results, &catalog.cached_shortcuts);
}

/// Computes the ordered catalog matches for `term`.
///
/// * empty term: the configured initial results
/// * `/command`: the categories named by the command, unfiltered
/// * `#tag`: entries with a tag starting with the rest of the term
/// * anything else: activities by typo-tolerant token match, all other
///   categories by token prefix
pub fn rank_results<'a>(
    term: &str,
    initial_results: InitialResults,
    catalog: &'a Catalog,
) -> Vec<Candidate<'a>> {
    if term.is_empty() {
        let results = initial(initial_results, catalog);
        debug!(
            target: "canvas_search_core",
            initial = %initial_results,
            count = results.len(),
            "initial results"
        );
        return results;
    }

    if term.starts_with('/') {
        return Command::parse(term)
            .map_or_else(Vec::new, |command| command.list(catalog));
    }

    let mut results: Vec<Candidate<'a>> = Vec::new();
    if let Some(tag) = term.strip_prefix('#') {
        results.extend(tag_sort(&catalog.activities, tag));
        results.extend(tag_sort(&catalog.pinned_shortcuts, tag));
        results.extend(tag_sort(&catalog.static_shortcuts, tag));
        results.extend(tag_sort(&catalog.dynamic_shortcuts, tag));
        results.extend(tag_sort(&catalog.cached_shortcuts, tag));
        results.extend(tag_sort(&catalog.contacts, tag));
        results.extend(tag_sort(&catalog.calendar, tag));
    } else {
        results.extend(hamming_distance_sort(&catalog.activities, term));
        results.extend(token_sort(&catalog.pinned_shortcuts, term));
        results.extend(token_sort(&catalog.static_shortcuts, term));
        results.extend(token_sort(&catalog.dynamic_shortcuts, term));
        results.extend(token_sort(&catalog.cached_shortcuts, term));
        results.extend(token_sort(&catalog.contacts, term));
        results.extend(token_sort(&catalog.calendar, term));
    }
    debug!(target: "canvas_search_core", count = results.len(), "search results built");
    results
}

fn initial(initial_results: InitialResults, catalog: &Catalog) -> Vec<Candidate<'_>> {
    let mut results: Vec<Candidate<'_>> = Vec::new();
    match initial_results {
        InitialResults::Favorites => {
            extend(&mut results, &catalog.activities);
            extend(&mut results, &catalog.static_shortcuts);
            extend(&mut results, &catalog.dynamic_shortcuts);
            extend(&mut results, &catalog.pinned_shortcuts);
            extend(&mut results, &catalog.cached_shortcuts);
            extend(&mut results, &catalog.contacts);
            results.retain(|candidate| candidate.is_favorite());
        }
        InitialResults::AllApps => extend(&mut results, &catalog.activities),
        InitialResults::Nothing => {}
    }
    results.sort_by(compare_labels);
    results
}

fn token_sort<'a, T>(items: &'a [T], term: &str) -> Vec<Candidate<'a>>
where
    T: SearchResult,
    &'a T: Into<Candidate<'a>>,
{
    prefix_sort(items, term, |item| {
        item.search_tokens().iter().map(String::as_str).collect()
    })
}

fn tag_sort<'a, T>(items: &'a [T], term: &str) -> Vec<Candidate<'a>>
where
    T: SearchResult,
    &'a T: Into<Candidate<'a>>,
{
    prefix_sort(items, term, |item| {
        item.tags().iter().map(Tag::unlocalized_name).collect()
    })
}

/// Keeps items with a selected term starting with `term`, ordered by the
/// index of the first such term and then by open count, descending.
fn prefix_sort<'a, T, F>(items: &'a [T], term: &str, select: F) -> Vec<Candidate<'a>>
where
    T: SearchResult,
    &'a T: Into<Candidate<'a>>,
    F: Fn(&'a T) -> Vec<&'a str>,
{
    let mut matches: Vec<(usize, &'a T)> = items
        .iter()
        .filter_map(|item| {
            select(item)
                .iter()
                .position(|token| starts_with_ignore_case(token, term))
                .map(|index| (index, item))
        })
        .collect();
    matches.sort_by(|(a_index, a), (b_index, b)| {
        a_index
            .cmp(b_index)
            .then_with(|| b.times_opened().cmp(&a.times_opened()))
    });
    matches.into_iter().map(|(_, item)| item.into()).collect()
}

/// Matches tokens against `term` allowing one substituted character for
/// favorites and none otherwise. Ordered by distance, then by the index of
/// the first token at that distance, then by open count, descending.
fn hamming_distance_sort<'a, T>(items: &'a [T], term: &str) -> Vec<Candidate<'a>>
where
    T: SearchResult,
    &'a T: Into<Candidate<'a>>,
{
    let mut matches: Vec<(usize, usize, &'a T)> = items
        .iter()
        .filter_map(|item| {
            let max_distance = usize::from(item.is_favorite());
            let distance = item
                .search_tokens()
                .iter()
                .filter_map(|token| hamming_distance(token, term, max_distance))
                .min()?;
            let index = item
                .search_tokens()
                .iter()
                .position(|token| hamming_distance(token, term, distance) == Some(distance))?;
            Some((distance, index, item))
        })
        .collect();
    matches.sort_by(|(a_distance, a_index, a), (b_distance, b_index, b)| {
        a_distance
            .cmp(b_distance)
            .then_with(|| a_index.cmp(b_index))
            .then_with(|| b.times_opened().cmp(&a.times_opened()))
    });
    matches
        .into_iter()
        .map(|(_, _, item)| item.into())
        .collect()
}

/// Number of differing characters between `term` and the start of `token`,
/// or `None` once it exceeds `max_distance`. A token shorter than the term
/// never matches.
pub fn hamming_distance(token: &str, term: &str, max_distance: usize) -> Option<usize> {
    if token.chars().count() < term.chars().count() {
        return None;
    }
    let mut distance = 0;
    for (left, right) in token.chars().zip(term.chars()) {
        if !same_char_ignore_case(left, right) {
            if distance == max_distance {
                return None;
            }
            distance += 1;
        }
    }
    Some(distance)
}

pub fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    let mut text = text.chars();
    prefix.chars().all(|expected| {
        text.next()
            .is_some_and(|actual| same_char_ignore_case(actual, expected))
    })
}

fn same_char_ignore_case(left: char, right: char) -> bool {
    left == right
        || left.to_uppercase().eq(right.to_uppercase())
        || left.to_lowercase().eq(right.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hamming_distance_is_bounded() {
        assert_eq!(hamming_distance("Camera", "cam", 0), Some(0));
        assert_eq!(hamming_distance("Camera", "cem", 0), None);
        assert_eq!(hamming_distance("Camera", "cem", 1), Some(1));
        assert_eq!(hamming_distance("Camera", "cxx", 1), None);
        assert_eq!(hamming_distance("Cam", "camera", 5), None);
        assert_eq!(hamming_distance("anything", "", 0), Some(0));
    }

    #[test]
    fn prefix_matching_ignores_case() {
        assert!(starts_with_ignore_case("Calendar", "cAL"));
        assert!(starts_with_ignore_case("Straße", "STRA"));
        assert!(!starts_with_ignore_case("Cal", "Calendar"));
        assert!(starts_with_ignore_case("x", ""));
    }

    #[test]
    fn commands_are_exact() {
        assert_eq!(Command::parse("/all"), Some(Command::All));
        assert_eq!(Command::parse("/ALL"), None);
        assert_eq!(Command::parse("/all "), None);
        for command in Command::all() {
            assert_eq!(Command::parse(command.as_str()), Some(*command));
        }
    }
}
