//! Notes API handlers.
//!
//! ```text
//! GET    /api/v1/notes?author=Ben
//! POST   /api/v1/notes {"author":"Ben","title":"Shopping list","body":"Milk"}
//! GET    /api/v1/notes/{id}
//! PATCH  /api/v1/notes/{id} {"body":null}
//! DELETE /api/v1/notes/{id}
//! ```
//!
//! The collection routes accept an optional trailing slash. Payloads are
//! decoded into permissive request structs and validated here, so every
//! rejection carries the same field-level error details.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Author, Error, Note, NoteChanges, NoteDraft, NoteId, NoteList, ParseNoteIdError, PatchField,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{AuthorSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    AUTHOR, TITLE, combine_validation_errors, deserialize_present, invalid_path_error,
    parse_author, parse_patch_title, parse_required_author, parse_required_title,
};

/// Request body for `POST /api/v1/notes`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateNoteRequest {
    #[schema(value_type = AuthorSchema)]
    pub author: Option<String>,
    #[schema(min_length = 1, max_length = 255, example = "Shopping list")]
    pub title: Option<String>,
    #[schema(example = "Milk, eggs")]
    pub body: Option<String>,
}

/// Request body for `PATCH /api/v1/notes/{id}`.
///
/// Keys left out are untouched. `"body": null` clears the body;
/// `"title": null` is rejected.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateNoteRequest {
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<String>, min_length = 1, max_length = 255)]
    pub title: PatchField<String>,
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<String>)]
    pub body: PatchField<String>,
}

/// Query parameters for `GET /api/v1/notes`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListNotesQuery {
    /// Restrict the listing to one author.
    #[param(value_type = Option<AuthorSchema>)]
    pub author: Option<String>,
}

/// Note representation returned by every notes endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NoteResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(value_type = AuthorSchema)]
    pub author: Author,
    #[schema(example = "Shopping list")]
    pub title: String,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id.get(),
            author: note.author,
            title: note.title.into(),
            body: note.body,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

/// Listing returned by `GET /api/v1/notes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NoteListResponse {
    pub items: Vec<NoteResponse>,
    pub total: usize,
}

impl From<NoteList> for NoteListResponse {
    fn from(list: NoteList) -> Self {
        Self {
            items: list.items.into_iter().map(NoteResponse::from).collect(),
            total: list.total,
        }
    }
}

fn parse_create_request(payload: CreateNoteRequest) -> Result<NoteDraft, Error> {
    let author = parse_required_author(payload.author, AUTHOR);
    let title = parse_required_title(payload.title, TITLE);
    match (author, title) {
        (Ok(author), Ok(title)) => Ok(NoteDraft {
            author,
            title,
            body: payload.body,
        }),
        (Err(err), title) => Err(combine_validation_errors(err, title.err())),
        (Ok(_), Err(err)) => Err(err),
    }
}

fn parse_update_request(payload: UpdateNoteRequest) -> Result<NoteChanges, Error> {
    Ok(NoteChanges {
        title: parse_patch_title(payload.title, TITLE)?,
        body: payload.body,
    })
}

/// Integers outside the storage range cannot exist, so they are reported
/// exactly like a missing row. Anything else is a malformed path.
fn note_id_or_not_found(raw: &str) -> Result<NoteId, Error> {
    raw.parse::<NoteId>().map_err(|err| match err {
        ParseNoteIdError::OutOfRange => {
            Error::not_found("note not found").with_details(json!({ "id": raw }))
        }
        ParseNoteIdError::NotAnInteger => invalid_path_error(raw),
    })
}

/// List notes, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/notes",
    params(ListNotesQuery),
    responses(
        (status = 200, description = "Notes, newest first", body = NoteListResponse),
        (status = 422, description = "Unknown author filter", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["notes"],
    operation_id = "listNotes"
)]
#[get("/notes{_:/?}")]
pub async fn list_notes(
    state: web::Data<HttpState>,
    query: web::Query<ListNotesQuery>,
) -> ApiResult<web::Json<NoteListResponse>> {
    let author = query
        .into_inner()
        .author
        .map(|raw| parse_author(&raw, AUTHOR))
        .transpose()?;
    let list = state.notes_query.list_notes(author).await?;
    Ok(web::Json(NoteListResponse::from(list)))
}

/// Create a note.
#[utoipa::path(
    post,
    path = "/api/v1/notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Created note", body = NoteResponse),
        (status = 422, description = "Validation failed", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["notes"],
    operation_id = "createNote"
)]
#[post("/notes{_:/?}")]
pub async fn create_note(
    state: web::Data<HttpState>,
    payload: web::Json<CreateNoteRequest>,
) -> ApiResult<HttpResponse> {
    let draft = parse_create_request(payload.into_inner())?;
    let note = state.notes.create_note(draft).await?;
    info!(note_id = %note.id, author = %note.author, "note created");
    Ok(HttpResponse::Created().json(NoteResponse::from(note)))
}

/// Fetch one note.
#[utoipa::path(
    get,
    path = "/api/v1/notes/{id}",
    params(("id" = i64, Path, description = "Note identifier")),
    responses(
        (status = 200, description = "Note", body = NoteResponse),
        (status = 404, description = "Note not found", body = ErrorSchema),
        (status = 422, description = "Identifier is not an integer", body = ErrorSchema)
    ),
    tags = ["notes"],
    operation_id = "getNote"
)]
#[get("/notes/{id}")]
pub async fn get_note(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<NoteResponse>> {
    let id = note_id_or_not_found(&path.into_inner())?;
    let note = state.notes_query.get_note(id).await?;
    Ok(web::Json(NoteResponse::from(note)))
}

/// Partially update a note.
#[utoipa::path(
    patch,
    path = "/api/v1/notes/{id}",
    params(("id" = i64, Path, description = "Note identifier")),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Updated note", body = NoteResponse),
        (status = 404, description = "Note not found", body = ErrorSchema),
        (status = 422, description = "Validation failed", body = ErrorSchema)
    ),
    tags = ["notes"],
    operation_id = "updateNote"
)]
#[patch("/notes/{id}")]
pub async fn update_note(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateNoteRequest>,
) -> ApiResult<web::Json<NoteResponse>> {
    let changes = parse_update_request(payload.into_inner())?;
    let id = note_id_or_not_found(&path.into_inner())?;
    let note = state.notes.update_note(id, changes).await?;
    info!(note_id = %id, "note updated");
    Ok(web::Json(NoteResponse::from(note)))
}

/// Delete a note.
#[utoipa::path(
    delete,
    path = "/api/v1/notes/{id}",
    params(("id" = i64, Path, description = "Note identifier")),
    responses(
        (status = 204, description = "Note deleted"),
        (status = 404, description = "Note not found", body = ErrorSchema),
        (status = 422, description = "Identifier is not an integer", body = ErrorSchema)
    ),
    tags = ["notes"],
    operation_id = "deleteNote"
)]
#[delete("/notes/{id}")]
pub async fn delete_note(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = note_id_or_not_found(&path.into_inner())?;
    state.notes.delete_note(id).await?;
    info!(note_id = %id, "note deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// Register the notes handlers together with the extractor configs that
/// turn malformed input into 422 responses.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(super::validation::json_config())
        .app_data(super::validation::query_config())
        .service(list_notes)
        .service(create_note)
        .service(get_note)
        .service(update_note)
        .service(delete_note);
}

#[cfg(test)]
#[path = "notes_tests.rs"]
mod tests;
