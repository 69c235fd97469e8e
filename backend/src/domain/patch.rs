//! Presence-aware field wrapper for partial updates.

/// A field in a partial update.
///
/// Distinguishes a field the client left out from one it explicitly set to
/// `null`, which plain `Option<T>` cannot express.
///
/// # Examples
/// ```
/// use household_notes::domain::PatchField;
///
/// assert_eq!(PatchField::<String>::Absent.into_update(), None);
/// assert_eq!(PatchField::<String>::Null.into_update(), Some(None));
/// assert_eq!(
///     PatchField::Value("x".to_owned()).into_update(),
///     Some(Some("x".to_owned()))
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PatchField<T> {
    /// The field was not supplied; leave the stored value alone.
    #[default]
    Absent,
    /// The field was supplied as `null`.
    Null,
    /// The field was supplied with a value.
    Value(T),
}

impl<T> PatchField<T> {
    /// Collapse into the nested-option shape used by changesets:
    /// `None` skips the column, `Some(None)` writes `NULL`.
    pub fn into_update(self) -> Option<Option<T>> {
        match self {
            Self::Absent => None,
            Self::Null => Some(None),
            Self::Value(value) => Some(Some(value)),
        }
    }

    /// Borrowing variant of [`PatchField::into_update`].
    pub fn as_update(&self) -> Option<Option<&T>> {
        match self {
            Self::Absent => None,
            Self::Null => Some(None),
            Self::Value(value) => Some(Some(value)),
        }
    }
}

impl<T> From<Option<T>> for PatchField<T> {
    /// A present key: `None` means an explicit `null`.
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Value(value),
            None => Self::Null,
        }
    }
}
