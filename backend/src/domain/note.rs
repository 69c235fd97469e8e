//! Note aggregate and its value types.
//!
//! A note belongs to one of two fixed household authors, carries a non-blank
//! title and an optional body, and records when it was created and last
//! changed. Only the title and body can change after creation.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::PatchField;

/// Maximum title length in characters, matching the `VARCHAR(255)` column.
pub const NOTE_TITLE_MAX: usize = 255;

/// Closed set of household members who can author a note.
///
/// # Examples
/// ```
/// use household_notes::domain::Author;
///
/// let author: Author = "Wife".parse().expect("known author");
/// assert_eq!(author, Author::Wife);
/// assert!("wife".parse::<Author>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Author {
    Ben,
    Wife,
}

impl Author {
    /// Every permitted author, in declaration order.
    pub const ALL: [Self; 2] = [Self::Ben, Self::Wife];

    /// Wire and database label for the author.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ben => "Ben",
            Self::Wife => "Wife",
        }
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown author label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAuthorError {
    /// The unrecognised input value.
    pub input: String,
}

impl fmt::Display for ParseAuthorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown author: {}", self.input)
    }
}

impl std::error::Error for ParseAuthorError {}

impl std::str::FromStr for Author {
    type Err = ParseAuthorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|author| author.as_str() == s)
            .ok_or_else(|| ParseAuthorError {
                input: s.to_owned(),
            })
    }
}

/// Storage-assigned note identifier.
///
/// Parsing from text separates input that is not an integer at all from an
/// integer no stored note can carry.
///
/// # Examples
/// ```
/// use household_notes::domain::{NoteId, ParseNoteIdError};
///
/// assert_eq!("7".parse::<NoteId>(), Ok(NoteId::new(7)));
/// assert_eq!(
///     "99999999999999999999".parse::<NoteId>(),
///     Err(ParseNoteIdError::OutOfRange)
/// );
/// assert_eq!("abc".parse::<NoteId>(), Err(ParseNoteIdError::NotAnInteger));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteId(i32);

impl NoteId {
    /// Wrap a raw identifier.
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i32 {
        self.0
    }
}

/// Error returned when a path segment cannot name a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseNoteIdError {
    #[error("note identifier must be an integer")]
    NotAnInteger,
    /// An integer outside the `INT4` identifier column.
    #[error("note identifier is out of range")]
    OutOfRange,
}

impl std::str::FromStr for NoteId {
    type Err = ParseNoteIdError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
        if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(ParseNoteIdError::NotAnInteger);
        }
        raw.parse::<i32>()
            .map(Self)
            .map_err(|_| ParseNoteIdError::OutOfRange)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation errors returned by [`NoteTitle::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteTitleError {
    Blank,
    TooLong { max: usize },
}

impl fmt::Display for NoteTitleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => write!(f, "title must not be blank"),
            Self::TooLong { max } => write!(f, "title must be at most {max} characters"),
        }
    }
}

impl std::error::Error for NoteTitleError {}

/// Note title: trimmed, non-empty, at most [`NOTE_TITLE_MAX`] characters.
///
/// # Examples
/// ```
/// use household_notes::domain::{NoteTitle, NoteTitleError};
///
/// let title = NoteTitle::new("  Shopping list ").expect("valid title");
/// assert_eq!(title.as_ref(), "Shopping list");
/// assert_eq!(NoteTitle::new("   "), Err(NoteTitleError::Blank));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteTitle(String);

impl NoteTitle {
    /// Validate and construct a title, trimming surrounding whitespace.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, NoteTitleError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(NoteTitleError::Blank);
        }
        if trimmed.chars().count() > NOTE_TITLE_MAX {
            return Err(NoteTitleError::TooLong {
                max: NOTE_TITLE_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for NoteTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for NoteTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<NoteTitle> for String {
    fn from(value: NoteTitle) -> Self {
        value.0
    }
}

/// Validated input for creating a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub author: Author,
    pub title: NoteTitle,
    pub body: Option<String>,
}

/// Validated partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteChanges {
    pub title: Option<NoteTitle>,
    pub body: PatchField<String>,
}

/// Persisted note.
///
/// ## Invariants
/// - `updated_at >= created_at`.
/// - `author` and `created_at` never change after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    pub author: Author,
    pub title: NoteTitle,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Materialise a freshly created note; both timestamps are `now`.
    pub fn from_draft(id: NoteId, draft: NoteDraft, now: DateTime<Utc>) -> Self {
        let NoteDraft {
            author,
            title,
            body,
        } = draft;
        Self {
            id,
            author,
            title,
            body,
            created_at: now,
            updated_at: now,
        }
    }

    /// Return a copy with `changes` applied and `updated_at` refreshed.
    pub fn apply(&self, changes: &NoteChanges, now: DateTime<Utc>) -> Self {
        let mut updated = self.clone();
        if let Some(title) = &changes.title {
            updated.title = title.clone();
        }
        if let Some(body) = changes.body.clone().into_update() {
            updated.body = body;
        }
        updated.updated_at = next_updated_at(self.updated_at, now);
        updated
    }
}

/// Timestamp for a mutation that must strictly follow `previous`.
///
/// Uses `now` unless the clock has not moved past `previous` at microsecond
/// resolution, in which case it bumps `previous` by one microsecond.
///
/// # Examples
/// ```
/// use chrono::{TimeDelta, TimeZone, Utc};
/// use household_notes::domain::next_updated_at;
///
/// let previous = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
/// assert_eq!(
///     next_updated_at(previous, previous),
///     previous + TimeDelta::microseconds(1)
/// );
/// ```
pub fn next_updated_at(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + TimeDelta::microseconds(1)
    }
}

/// Notes returned by a listing together with their count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteList {
    pub items: Vec<Note>,
    pub total: usize,
}

impl From<Vec<Note>> for NoteList {
    fn from(items: Vec<Note>) -> Self {
        let total = items.len();
        Self { items, total }
    }
}
