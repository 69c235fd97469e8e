//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data`, so they depend only
//! on the note driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{NotesCommand, NotesQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub notes: Arc<dyn NotesCommand>,
    pub notes_query: Arc<dyn NotesQuery>,
}

impl HttpState {
    /// Build state from one service implementing both ports.
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: NotesCommand + NotesQuery + 'static,
    {
        Self {
            notes: service.clone(),
            notes_query: service,
        }
    }
}
