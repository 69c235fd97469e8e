//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed note values used by the HTTP and
//! persistence adapters, and the service implementing the note use cases.
//! Inbound and outbound adapters depend on this module; it depends on
//! neither.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Note and its value types (`Author`, `NoteId`, `NoteTitle`, ...).
//! - NoteService: implementation of the note driving ports.
//! - TraceId: request-scoped correlation identifier.

pub mod error;
pub mod note;
mod note_service;
mod patch;
pub mod ports;
pub mod trace_id;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::note::{
    Author, NOTE_TITLE_MAX, Note, NoteChanges, NoteDraft, NoteId, NoteList, NoteTitle,
    NoteTitleError, ParseAuthorError, ParseNoteIdError, next_updated_at,
};
pub use self::note_service::NoteService;
pub use self::patch::PatchField;
pub use self::trace_id::TraceId;

/// HTTP header name used to propagate trace identifiers.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use household_notes::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("note not found"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
