//! Assembly of the per-category candidate lists the ranking engine consumes.

use std::{cmp::Ordering, fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::settings::Settings;
use crate::types::{
    Activity, CalendarEvent, Contact, Hideable, Labeled, Renameable, SearchResult, Shortcut,
    ShortcutKind,
};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed catalog snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything the launcher knows about, as delivered by the platform layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSnapshot {
    pub activities: Vec<Activity>,
    pub shortcuts: Vec<Shortcut>,
    pub contacts: Vec<Contact>,
    pub calendar: Vec<CalendarEvent>,
}

impl CatalogSnapshot {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let json = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Applies `settings` and splits the snapshot into ranked categories.
    /// Calendar events that ended before `now_millis` are dropped.
    pub fn into_catalog(self, settings: &Settings, now_millis: i64) -> Catalog {
        let mut activities: Vec<Activity> = visible(self.activities);
        if !settings.sort_results_by_usage {
            activities.iter_mut().for_each(Activity::reset_times_opened);
        }
        activities.sort_by(|a, b| {
            b.is_favorite()
                .cmp(&a.is_favorite())
                .then_with(|| compare_labels(a, b))
        });

        let contact_labels: Vec<&str> = self.contacts.iter().map(|c| c.original_label()).collect();
        let mut static_shortcuts = Vec::new();
        let mut dynamic_shortcuts = Vec::new();
        let mut pinned_shortcuts = Vec::new();
        let mut cached_shortcuts = Vec::new();
        for shortcut in self.shortcuts {
            if shortcut.is_hidden() {
                continue;
            }
            let hides_contact =
                matches!(shortcut.kind, ShortcutKind::Dynamic | ShortcutKind::Cached)
                    && contact_labels.contains(&shortcut.label());
            if settings.hide_contact_shortcuts && hides_contact {
                continue;
            }
            match shortcut.kind {
                ShortcutKind::Static => static_shortcuts.push(shortcut),
                ShortcutKind::Dynamic => dynamic_shortcuts.push(shortcut),
                ShortcutKind::Pinned => pinned_shortcuts.push(shortcut),
                ShortcutKind::Cached => cached_shortcuts.push(shortcut),
            }
        }
        for list in [
            &mut static_shortcuts,
            &mut dynamic_shortcuts,
            &mut pinned_shortcuts,
            &mut cached_shortcuts,
        ] {
            list.sort_by(compare_labels);
        }

        let contacts = if settings.contact_search_enabled {
            let mut contacts = visible(self.contacts);
            contacts.sort_by(|a, b| {
                b.starred
                    .cmp(&a.starred)
                    .then_with(|| b.priority.cmp(&a.priority))
                    .then_with(|| compare_labels(a, b))
            });
            contacts
        } else {
            Vec::new()
        };

        let calendar = if settings.calendar_search_enabled {
            let mut events: Vec<CalendarEvent> = self
                .calendar
                .into_iter()
                .filter(|event| !event.has_ended(now_millis))
                .collect();
            events.sort_by_key(|event| (event.is_recurring(), event.start_time));
            events
        } else {
            Vec::new()
        };

        let catalog = Catalog {
            activities,
            static_shortcuts,
            dynamic_shortcuts,
            pinned_shortcuts,
            cached_shortcuts,
            contacts,
            calendar,
        };
        debug!(
            target: "canvas_data",
            activities = catalog.activities.len(),
            static_shortcuts = catalog.static_shortcuts.len(),
            dynamic_shortcuts = catalog.dynamic_shortcuts.len(),
            pinned_shortcuts = catalog.pinned_shortcuts.len(),
            cached_shortcuts = catalog.cached_shortcuts.len(),
            contacts = catalog.contacts.len(),
            calendar = catalog.calendar.len(),
            "catalog assembled"
        );
        catalog
    }
}

/// Category-partitioned candidates, each list already in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Catalog {
    pub activities: Vec<Activity>,
    pub static_shortcuts: Vec<Shortcut>,
    pub dynamic_shortcuts: Vec<Shortcut>,
    pub pinned_shortcuts: Vec<Shortcut>,
    pub cached_shortcuts: Vec<Shortcut>,
    pub contacts: Vec<Contact>,
    pub calendar: Vec<CalendarEvent>,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.activities.len()
            + self.static_shortcuts.len()
            + self.dynamic_shortcuts.len()
            + self.pinned_shortcuts.len()
            + self.cached_shortcuts.len()
            + self.contacts.len()
            + self.calendar.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn shortcuts(&self, kind: ShortcutKind) -> &[Shortcut] {
        match kind {
            ShortcutKind::Static => &self.static_shortcuts,
            ShortcutKind::Dynamic => &self.dynamic_shortcuts,
            ShortcutKind::Pinned => &self.pinned_shortcuts,
            ShortcutKind::Cached => &self.cached_shortcuts,
        }
    }
}

fn visible<T: Hideable>(items: Vec<T>) -> Vec<T> {
    items.into_iter().filter(|item| !item.is_hidden()).collect()
}

/// Case-insensitive label order.
pub fn compare_labels<T: Labeled + ?Sized>(a: &T, b: &T) -> Ordering {
    a.label()
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.label().chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activities_put_favorites_first() {
        let snapshot = CatalogSnapshot {
            activities: vec![
                Activity::new("p", "b", "banana"),
                Activity::new("p", "c", "Cherry").with_favorite(true),
                Activity::new("p", "a", "Apple"),
                Activity::new("p", "h", "Hidden").with_hidden(true),
            ],
            ..CatalogSnapshot::default()
        };
        let catalog = snapshot.into_catalog(&Settings::default(), 0);
        let labels: Vec<&str> = catalog.activities.iter().map(|a| a.label()).collect();
        assert_eq!(labels, ["Cherry", "Apple", "banana"]);
    }

    #[test]
    fn usage_is_forgotten_when_disabled() {
        let snapshot = CatalogSnapshot {
            activities: vec![Activity::new("p", "a", "App").with_times_opened(12)],
            ..CatalogSnapshot::default()
        };
        let settings = Settings {
            sort_results_by_usage: false,
            ..Settings::default()
        };
        let catalog = snapshot.into_catalog(&settings, 0);
        assert_eq!(catalog.activities[0].times_opened(), 0);
    }

    #[test]
    fn contact_shortcuts_are_hidden() {
        let snapshot = CatalogSnapshot {
            shortcuts: vec![
                Shortcut::new("chat", "1", ShortcutKind::Dynamic, "Ada"),
                Shortcut::new("chat", "2", ShortcutKind::Pinned, "Ada"),
                Shortcut::new("chat", "3", ShortcutKind::Cached, "Grace"),
                Shortcut::new("chat", "4", ShortcutKind::Dynamic, "New group"),
            ],
            contacts: vec![Contact::new(1, "a", "Ada"), Contact::new(2, "g", "Grace")],
            ..CatalogSnapshot::default()
        };

        let catalog = snapshot.clone().into_catalog(&Settings::default(), 0);
        assert_eq!(catalog.dynamic_shortcuts.len(), 1);
        assert_eq!(catalog.pinned_shortcuts.len(), 1);
        assert!(catalog.cached_shortcuts.is_empty());

        let settings = Settings {
            hide_contact_shortcuts: false,
            ..Settings::default()
        };
        let catalog = snapshot.into_catalog(&settings, 0);
        assert_eq!(catalog.dynamic_shortcuts.len(), 2);
        assert_eq!(catalog.cached_shortcuts.len(), 1);
    }

    #[test]
    fn contacts_sort_by_star_priority_then_label() {
        let snapshot = CatalogSnapshot {
            contacts: vec![
                Contact::new(1, "a", "zed"),
                Contact::new(2, "b", "Bob").with_priority(5),
                Contact::new(3, "c", "Carol").with_starred(true),
                Contact::new(4, "d", "alice"),
            ],
            ..CatalogSnapshot::default()
        };
        let catalog = snapshot.clone().into_catalog(&Settings::default(), 0);
        let labels: Vec<&str> = catalog.contacts.iter().map(|c| c.label()).collect();
        assert_eq!(labels, ["Carol", "Bob", "alice", "zed"]);

        let settings = Settings {
            contact_search_enabled: false,
            ..Settings::default()
        };
        assert!(snapshot.into_catalog(&settings, 0).contacts.is_empty());
    }

    #[test]
    fn calendar_drops_past_events() {
        let snapshot = CatalogSnapshot {
            calendar: vec![
                CalendarEvent::recurring(1, "Gym"),
                CalendarEvent::single(2, "Dentist", 5_000, 6_000),
                CalendarEvent::single(3, "Breakfast", 100, 200),
                CalendarEvent::single(4, "Meeting", 1_000, 2_000),
            ],
            ..CatalogSnapshot::default()
        };
        let settings = Settings {
            calendar_search_enabled: true,
            ..Settings::default()
        };
        let catalog = snapshot.clone().into_catalog(&settings, 500);
        let labels: Vec<&str> = catalog.calendar.iter().map(|e| e.label()).collect();
        assert_eq!(labels, ["Meeting", "Dentist", "Gym"]);

        assert!(snapshot
            .into_catalog(&Settings::default(), 500)
            .calendar
            .is_empty());
    }

    #[test]
    fn malformed_json_is_reported() {
        let error = CatalogSnapshot::from_json("{\"activities\": 3}").unwrap_err();
        assert!(matches!(error, CatalogError::Json(_)));
        assert!(CatalogSnapshot::from_json("{}").unwrap().activities.is_empty());
    }
}
