use serde::{Deserialize, Serialize};

use super::{
    apply_rename, dedup_tags, label_tokens, Favoritable, Hideable, Labeled, Renameable,
    SearchResult, Tag, Taggable, Uid,
};

/// A launchable app entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ActivityRecord")]
pub struct Activity {
    pub package: String,
    pub class: String,
    label: String,
    original_label: Option<String>,
    favorite: bool,
    tags: Vec<Tag>,
    times_opened: i64,
    hidden: bool,
    uid: Uid,
    search_tokens: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ActivityRecord {
    package: String,
    class: String,
    label: String,
    #[serde(default)]
    original_label: Option<String>,
    #[serde(default)]
    favorite: bool,
    #[serde(default)]
    tags: Vec<Tag>,
    #[serde(default)]
    times_opened: i64,
    #[serde(default)]
    hidden: bool,
}

impl From<ActivityRecord> for Activity {
    fn from(record: ActivityRecord) -> Self {
        let mut activity = Activity::new(&record.package, &record.class, &record.label)
            .with_favorite(record.favorite)
            .with_tags(record.tags)
            .with_times_opened(record.times_opened)
            .with_hidden(record.hidden);
        activity.original_label = record
            .original_label
            .filter(|original| *original != activity.label);
        activity
    }
}

impl Activity {
    pub fn new(package: &str, class: &str, label: &str) -> Self {
        let mut activity = Self {
            package: package.to_string(),
            class: class.to_string(),
            label: label.to_string(),
            original_label: None,
            favorite: false,
            tags: Vec::new(),
            times_opened: 0,
            hidden: false,
            uid: Uid::activity(package, class),
            search_tokens: Vec::new(),
        };
        activity.refresh_tokens();
        activity
    }

    #[must_use]
    pub fn with_favorite(mut self, favorite: bool) -> Self {
        self.favorite = favorite;
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.set_tags(tags);
        self
    }

    #[must_use]
    pub fn with_times_opened(mut self, times_opened: i64) -> Self {
        self.times_opened = times_opened;
        self
    }

    #[must_use]
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Forgets usage statistics, used when sorting by usage is turned off.
    pub fn reset_times_opened(&mut self) {
        self.times_opened = 0;
    }

    fn refresh_tokens(&mut self) {
        self.search_tokens = label_tokens(&self.label)
            .chain(self.tags.iter().map(|tag| tag.unlocalized_name().to_string()))
            .collect();
    }
}

impl SearchResult for Activity {
    fn uid(&self) -> &Uid {
        &self.uid
    }

    fn search_tokens(&self) -> &[String] {
        &self.search_tokens
    }

    fn tags(&self) -> &[Tag] {
        &self.tags
    }

    fn is_favorite(&self) -> bool {
        self.favorite
    }

    fn times_opened(&self) -> i64 {
        self.times_opened
    }
}

impl Labeled for Activity {
    fn label(&self) -> &str {
        &self.label
    }
}

impl Renameable for Activity {
    fn original_label_or_none(&self) -> Option<&str> {
        self.original_label.as_deref()
    }

    fn rename(&mut self, new_label: &str) {
        apply_rename(&mut self.label, &mut self.original_label, new_label);
        self.refresh_tokens();
    }
}

impl Hideable for Activity {
    fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }
}

impl Favoritable for Activity {
    fn set_favorite(&mut self, favorite: bool) {
        self.favorite = favorite;
    }
}

impl Taggable for Activity {
    fn set_tags(&mut self, tags: Vec<Tag>) {
        self.tags = dedup_tags(tags);
        self.refresh_tokens();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortcutKind {
    /// Declared in the app manifest.
    Static,
    /// Published by the app at runtime.
    Dynamic,
    /// Added by the user.
    Pinned,
    Cached,
}

impl ShortcutKind {
    pub fn all() -> &'static [ShortcutKind] {
        &[
            ShortcutKind::Static,
            ShortcutKind::Dynamic,
            ShortcutKind::Pinned,
            ShortcutKind::Cached,
        ]
    }
}

/// An app shortcut, e.g. "New message" of a messenger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ShortcutRecord")]
pub struct Shortcut {
    pub package: String,
    pub shortcut_id: String,
    pub kind: ShortcutKind,
    /// Priority within the app for static and dynamic shortcuts, else 0.
    pub rank: i32,
    label: String,
    original_label: Option<String>,
    hidden: bool,
    uid: Uid,
    search_tokens: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ShortcutRecord {
    package: String,
    #[serde(alias = "id")]
    shortcut_id: String,
    kind: ShortcutKind,
    label: String,
    #[serde(default)]
    rank: i32,
    #[serde(default)]
    original_label: Option<String>,
    #[serde(default)]
    hidden: bool,
}

impl From<ShortcutRecord> for Shortcut {
    fn from(record: ShortcutRecord) -> Self {
        let mut shortcut = Shortcut::new(
            &record.package,
            &record.shortcut_id,
            record.kind,
            &record.label,
        )
        .with_rank(record.rank)
        .with_hidden(record.hidden);
        shortcut.original_label = record
            .original_label
            .filter(|original| *original != shortcut.label);
        shortcut
    }
}

impl Shortcut {
    pub fn new(package: &str, shortcut_id: &str, kind: ShortcutKind, label: &str) -> Self {
        Self {
            package: package.to_string(),
            shortcut_id: shortcut_id.to_string(),
            kind,
            rank: 0,
            label: label.to_string(),
            original_label: None,
            hidden: false,
            uid: Uid::shortcut(package, shortcut_id),
            search_tokens: label_tokens(label).collect(),
        }
    }

    #[must_use]
    pub fn with_rank(mut self, rank: i32) -> Self {
        self.rank = rank;
        self
    }

    #[must_use]
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}

impl SearchResult for Shortcut {
    fn uid(&self) -> &Uid {
        &self.uid
    }

    fn search_tokens(&self) -> &[String] {
        &self.search_tokens
    }
}

impl Labeled for Shortcut {
    fn label(&self) -> &str {
        &self.label
    }
}

impl Renameable for Shortcut {
    fn original_label_or_none(&self) -> Option<&str> {
        self.original_label.as_deref()
    }

    fn rename(&mut self, new_label: &str) {
        apply_rename(&mut self.label, &mut self.original_label, new_label);
        self.search_tokens = label_tokens(&self.label).collect();
    }
}

impl Hideable for Shortcut {
    fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }
}

/// An entry of the address book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ContactRecord")]
pub struct Contact {
    /// Id currently used by the system; may change between syncs.
    pub id: i64,
    /// More stable identifier than `id`.
    pub lookup_key: String,
    pub starred: bool,
    /// Higher values mean higher priority.
    pub priority: i32,
    label: String,
    original_label: Option<String>,
    hidden: bool,
    uid: Uid,
    search_tokens: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ContactRecord {
    id: i64,
    lookup_key: String,
    label: String,
    #[serde(default)]
    starred: bool,
    #[serde(default)]
    priority: i32,
    #[serde(default)]
    original_label: Option<String>,
    #[serde(default)]
    hidden: bool,
}

impl From<ContactRecord> for Contact {
    fn from(record: ContactRecord) -> Self {
        let mut contact = Contact::new(record.id, &record.lookup_key, &record.label)
            .with_starred(record.starred)
            .with_priority(record.priority)
            .with_hidden(record.hidden);
        contact.original_label = record
            .original_label
            .filter(|original| *original != contact.label);
        contact
    }
}

impl Contact {
    pub fn new(id: i64, lookup_key: &str, label: &str) -> Self {
        Self {
            id,
            lookup_key: lookup_key.to_string(),
            starred: false,
            priority: 0,
            label: label.to_string(),
            original_label: None,
            hidden: false,
            uid: Uid::contact(lookup_key, id),
            search_tokens: label_tokens(label).collect(),
        }
    }

    #[must_use]
    pub fn with_starred(mut self, starred: bool) -> Self {
        self.starred = starred;
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}

impl SearchResult for Contact {
    fn uid(&self) -> &Uid {
        &self.uid
    }

    fn search_tokens(&self) -> &[String] {
        &self.search_tokens
    }
}

impl Labeled for Contact {
    fn label(&self) -> &str {
        &self.label
    }
}

impl Renameable for Contact {
    fn original_label_or_none(&self) -> Option<&str> {
        self.original_label.as_deref()
    }

    fn rename(&mut self, new_label: &str) {
        apply_rename(&mut self.label, &mut self.original_label, new_label);
        self.search_tokens = label_tokens(&self.label).collect();
    }
}

impl Hideable for Contact {
    fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CalendarEventRecord")]
pub struct CalendarEvent {
    pub event_id: i64,
    /// Milliseconds since the epoch, `None` for recurring events.
    pub start_time: Option<i64>,
    /// Milliseconds since the epoch, `None` for recurring events.
    pub end_time: Option<i64>,
    pub all_day: bool,
    pub location: Option<String>,
    label: String,
    uid: Uid,
    search_tokens: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CalendarEventRecord {
    event_id: i64,
    label: String,
    #[serde(default)]
    start_time: Option<i64>,
    #[serde(default)]
    end_time: Option<i64>,
    #[serde(default)]
    all_day: bool,
    #[serde(default)]
    location: Option<String>,
}

impl From<CalendarEventRecord> for CalendarEvent {
    fn from(record: CalendarEventRecord) -> Self {
        let mut event = match (record.start_time, record.end_time) {
            (Some(start), end) => {
                CalendarEvent::single(record.event_id, &record.label, start, end.unwrap_or(start))
            }
            (None, _) => CalendarEvent::recurring(record.event_id, &record.label),
        };
        event.all_day = record.all_day;
        event.location = record.location;
        event
    }
}

impl CalendarEvent {
    pub fn single(event_id: i64, label: &str, start_time: i64, end_time: i64) -> Self {
        Self::build(event_id, label, Some(start_time), Some(end_time))
    }

    pub fn recurring(event_id: i64, label: &str) -> Self {
        Self::build(event_id, label, None, None)
    }

    fn build(event_id: i64, label: &str, start_time: Option<i64>, end_time: Option<i64>) -> Self {
        Self {
            event_id,
            start_time,
            end_time,
            all_day: false,
            location: None,
            label: label.to_string(),
            uid: Uid::calendar(event_id),
            search_tokens: label_tokens(label).collect(),
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    #[must_use]
    pub fn with_all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }

    pub fn is_recurring(&self) -> bool {
        self.start_time.is_none()
    }

    /// Whether a non-recurring event ended before `now_millis`.
    pub fn has_ended(&self, now_millis: i64) -> bool {
        self.end_time.is_some_and(|end| end < now_millis)
    }
}

impl SearchResult for CalendarEvent {
    fn uid(&self) -> &Uid {
        &self.uid
    }

    fn search_tokens(&self) -> &[String] {
        &self.search_tokens
    }
}

impl Labeled for CalendarEvent {
    fn label(&self) -> &str {
        &self.label
    }
}
