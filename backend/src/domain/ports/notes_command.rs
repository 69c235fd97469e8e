//! Driving port for note mutations.
//!
//! HTTP handlers call [`NotesCommand`] with validated domain values; the
//! implementation owns timestamps and maps persistence failures onto the
//! shared [`Error`] envelope.

use async_trait::async_trait;

use crate::domain::{Error, Note, NoteChanges, NoteDraft, NoteId};

#[async_trait]
pub trait NotesCommand: Send + Sync {
    /// Create a note and return it as stored.
    async fn create_note(&self, draft: NoteDraft) -> Result<Note, Error>;

    /// Partially update a note.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::ErrorCode::NotFound`] when the note does not
    /// exist.
    async fn update_note(&self, id: NoteId, changes: NoteChanges) -> Result<Note, Error>;

    /// Delete a note.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::ErrorCode::NotFound`] when the note does not
    /// exist.
    async fn delete_note(&self, id: NoteId) -> Result<(), Error>;
}
