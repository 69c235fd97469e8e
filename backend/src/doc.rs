//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the notes and health endpoints plus the schema
//! wrappers from `inbound::http::schemas`, which keep domain types free of
//! utoipa derives. Swagger UI serves the document at `/docs/`.

use utoipa::OpenApi;

use crate::inbound::http::health::HealthStatus;
use crate::inbound::http::notes::{
    CreateNoteRequest, NoteListResponse, NoteResponse, UpdateNoteRequest,
};
use crate::inbound::http::schemas::{AuthorSchema, ErrorCodeSchema, ErrorSchema};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Household notes API",
        description = "CRUD interface for short household notes plus health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::notes::list_notes,
        crate::inbound::http::notes::create_note,
        crate::inbound::http::notes::get_note,
        crate::inbound::http::notes::update_note,
        crate::inbound::http::notes::delete_note,
        crate::inbound::http::health::health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        NoteResponse,
        NoteListResponse,
        CreateNoteRequest,
        UpdateNoteRequest,
        HealthStatus,
        AuthorSchema,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "notes", description = "Create, read, update and delete household notes"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
