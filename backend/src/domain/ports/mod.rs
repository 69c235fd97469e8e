//! Domain ports for the hexagonal boundary.
//!
//! Driving ports ([`NotesCommand`], [`NotesQuery`]) are called by inbound
//! adapters. The driven port ([`NoteRepository`]) is implemented by
//! persistence adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod note_repository;
mod notes_command;
mod notes_query;

#[cfg(test)]
pub use note_repository::MockNoteRepository;
pub use note_repository::{NoteRepository, NoteRepositoryError};
pub use notes_command::NotesCommand;
pub use notes_query::NotesQuery;
