use std::fmt;

use serde::{Deserialize, Serialize};

pub mod models;

pub use models::{Activity, CalendarEvent, Contact, Shortcut, ShortcutKind};

/// Stable identifier of a search result, formatted as `type/id`.
///
/// The id part is type specific, e.g. `activity/<package>/<class>`. Uids stay
/// the same across catalog reloads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uid(String);

impl Uid {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn activity(package: &str, class: &str) -> Self {
        Self(format!("activity/{package}/{class}"))
    }

    pub fn shortcut(package: &str, shortcut_id: &str) -> Self {
        Self(format!("shortcut/{package}/{shortcut_id}"))
    }

    pub fn contact(lookup_key: &str, id: i64) -> Self {
        Self(format!("contact/{lookup_key}/{id}"))
    }

    pub fn calendar(event_id: i64) -> Self {
        Self(format!("calendar/{event_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `type` segment, e.g. `activity`.
    pub fn kind(&self) -> &str {
        self.0
            .split_once('/')
            .map_or(self.0.as_str(), |(kind, _)| kind)
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tags shipped with the launcher. Stored by their lowercase English name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinTag {
    Game,
    Audio,
    Video,
    Image,
    Social,
    News,
    Maps,
    Productivity,
    Accessibility,
}

impl BuiltinTag {
    pub fn all() -> &'static [BuiltinTag] {
        &[
            BuiltinTag::Game,
            BuiltinTag::Audio,
            BuiltinTag::Video,
            BuiltinTag::Image,
            BuiltinTag::Social,
            BuiltinTag::News,
            BuiltinTag::Maps,
            BuiltinTag::Productivity,
            BuiltinTag::Accessibility,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            BuiltinTag::Game => "game",
            BuiltinTag::Audio => "audio",
            BuiltinTag::Video => "video",
            BuiltinTag::Image => "image",
            BuiltinTag::Social => "social",
            BuiltinTag::News => "news",
            BuiltinTag::Maps => "maps",
            BuiltinTag::Productivity => "productivity",
            BuiltinTag::Accessibility => "accessibility",
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|tag| tag.name().eq_ignore_ascii_case(s))
    }
}

/// A label that can be searched for with `#name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Tag {
    Builtin(BuiltinTag),
    Custom(String),
}

impl Tag {
    /// Name used for tag search; builtin tags use their English name.
    pub fn unlocalized_name(&self) -> &str {
        match self {
            Tag::Builtin(tag) => tag.name(),
            Tag::Custom(name) => name,
        }
    }

    /// Restores a stored tag name, mapping builtin names case-insensitively.
    pub fn parse(name: &str) -> Self {
        Tag::from(name.to_string())
    }
}

impl From<String> for Tag {
    fn from(value: String) -> Self {
        match BuiltinTag::from_str_loose(&value) {
            Some(builtin) => Tag::Builtin(builtin),
            None => Tag::Custom(value),
        }
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        match tag {
            Tag::Builtin(builtin) => builtin.name().to_string(),
            Tag::Custom(name) => name,
        }
    }
}

impl From<BuiltinTag> for Tag {
    fn from(tag: BuiltinTag) -> Self {
        Tag::Builtin(tag)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.unlocalized_name())
    }
}

/// Anything that can show up in the result list.
pub trait SearchResult {
    fn uid(&self) -> &Uid;

    /// Terms under which the result can be found, most relevant first.
    fn search_tokens(&self) -> &[String];

    fn tags(&self) -> &[Tag] {
        &[]
    }

    fn is_favorite(&self) -> bool {
        false
    }

    /// How often the result was opened, or `-1` when usage is not tracked.
    fn times_opened(&self) -> i64 {
        -1
    }

    /// Whether the result only exists to display an error.
    fn is_error(&self) -> bool {
        false
    }
}

pub trait Labeled: SearchResult {
    fn label(&self) -> &str;
}

pub trait Renameable: Labeled {
    /// Label before the user renamed the result, `None` when never renamed.
    fn original_label_or_none(&self) -> Option<&str>;

    fn rename(&mut self, new_label: &str);

    fn original_label(&self) -> &str {
        self.original_label_or_none()
            .unwrap_or_else(|| self.label())
    }
}

pub trait Hideable: SearchResult {
    fn is_hidden(&self) -> bool;

    fn set_hidden(&mut self, hidden: bool);

    fn is_hideable(&self) -> bool {
        true
    }
}

/// Favorites are listed first and matched with a typo tolerance.
pub trait Favoritable: SearchResult {
    fn set_favorite(&mut self, favorite: bool);
}

pub trait Taggable: SearchResult {
    fn set_tags(&mut self, tags: Vec<Tag>);
}

/// Splits a label into search tokens on single spaces.
pub(crate) fn label_tokens(label: &str) -> impl Iterator<Item = String> + '_ {
    label.split(' ').map(str::to_string)
}

/// Applies a rename, forgetting the custom label when it matches the original.
pub(crate) fn apply_rename(
    label: &mut String,
    original_label: &mut Option<String>,
    new_label: &str,
) {
    let original = original_label.take().unwrap_or_else(|| label.clone());
    if new_label != original {
        *original_label = Some(original);
    }
    *label = new_label.to_string();
}

/// Drops repeated tags while keeping the first occurrence in place.
pub(crate) fn dedup_tags(tags: Vec<Tag>) -> Vec<Tag> {
    let mut unique: Vec<Tag> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !unique.contains(&tag) {
            unique.push(tag);
        }
    }
    unique
}
