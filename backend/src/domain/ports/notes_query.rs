//! Driving port for note reads.

use async_trait::async_trait;

use crate::domain::{Author, Error, Note, NoteId, NoteList};

#[async_trait]
pub trait NotesQuery: Send + Sync {
    /// List notes newest first, optionally filtered by author.
    async fn list_notes(&self, author: Option<Author>) -> Result<NoteList, Error>;

    /// Fetch one note, failing with not-found when it does not exist.
    async fn get_note(&self, id: NoteId) -> Result<Note, Error>;
}
