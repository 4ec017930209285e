//! Candidate models, user settings, catalog assembly and the calculator,
//! unit conversion and metronome parsers of the launcher search.

pub mod catalog;
pub mod math;
pub mod settings;
pub mod types;

pub use catalog::{compare_labels, Catalog, CatalogError, CatalogSnapshot};
pub use settings::{InitialResults, Settings};
pub use types::{
    Activity, BuiltinTag, CalendarEvent, Contact, Favoritable, Hideable, Labeled, Renameable,
    SearchResult, Shortcut, ShortcutKind, Tag, Taggable, Uid,
};
