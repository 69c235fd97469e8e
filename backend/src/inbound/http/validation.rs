//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every client input failure becomes an `invalid_request` domain error
//! whose `details` name the offending field and a stable field code. When
//! several fields fail, `details.errors` lists every one of them. The
//! extractor configs at the bottom route Actix's own JSON and query
//! rejections through the same envelope.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::web;
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};
use tracing::debug;

use crate::domain::{Author, Error, NoteTitle, NoteTitleError, PatchField};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidAuthor,
    BlankTitle,
    TitleTooLong,
    NullTitle,
    InvalidBody,
    InvalidQuery,
    InvalidPath,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidAuthor => "invalid_author",
            ErrorCode::BlankTitle => "blank_title",
            ErrorCode::TitleTooLong => "title_too_long",
            ErrorCode::NullTitle => "null_title",
            ErrorCode::InvalidBody => "invalid_body",
            ErrorCode::InvalidQuery => "invalid_query",
            ErrorCode::InvalidPath => "invalid_path",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

pub(crate) const AUTHOR: FieldName = FieldName::new("author");
pub(crate) const TITLE: FieldName = FieldName::new("title");

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_author_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    let allowed = Author::ALL.map(|author| author.as_str()).join(", ");
    ValidationError::new(field, format!("{field} must be one of: {allowed}"))
        .with_value(ErrorCode::InvalidAuthor, value)
}

pub(crate) fn null_title_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must not be null"))
        .with_code(ErrorCode::NullTitle)
}

fn title_error(field: FieldName, err: &NoteTitleError) -> Error {
    let code = match err {
        NoteTitleError::Blank => ErrorCode::BlankTitle,
        NoteTitleError::TooLong { .. } => ErrorCode::TitleTooLong,
    };
    ValidationError::new(field.as_str(), err.to_string()).with_code(code)
}

/// Parse an author label, rejecting anything outside the enumeration.
pub(crate) fn parse_author(value: &str, field: FieldName) -> Result<Author, Error> {
    value
        .parse::<Author>()
        .map_err(|_| invalid_author_error(field, value))
}

/// Parse an author label that must be present.
pub(crate) fn parse_required_author(
    value: Option<String>,
    field: FieldName,
) -> Result<Author, Error> {
    let value = value.ok_or_else(|| missing_field_error(field))?;
    parse_author(&value, field)
}

/// Validate a title, trimming surrounding whitespace.
pub(crate) fn parse_title(value: &str, field: FieldName) -> Result<NoteTitle, Error> {
    NoteTitle::new(value).map_err(|err| title_error(field, &err))
}

/// Validate a title that must be present.
pub(crate) fn parse_required_title(
    value: Option<String>,
    field: FieldName,
) -> Result<NoteTitle, Error> {
    let value = value.ok_or_else(|| missing_field_error(field))?;
    parse_title(&value, field)
}

/// Validate a patched title: absent is fine, `null` is not.
pub(crate) fn parse_patch_title(
    value: PatchField<String>,
    field: FieldName,
) -> Result<Option<NoteTitle>, Error> {
    match value {
        PatchField::Absent => Ok(None),
        PatchField::Null => Err(null_title_error(field)),
        PatchField::Value(raw) => parse_title(&raw, field).map(Some),
    }
}

/// Serde helper distinguishing a missing key from an explicit `null`.
///
/// Pair with `#[serde(default)]` so absent keys fall back to
/// [`PatchField::Absent`].
pub(crate) fn deserialize_present<'de, D, T>(deserializer: D) -> Result<PatchField<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(PatchField::from)
}

fn invalid_json_error(err: &JsonPayloadError) -> Error {
    let message = match err {
        JsonPayloadError::ContentType => "request body must be application/json".to_owned(),
        JsonPayloadError::Deserialize(inner) => format!("invalid JSON body: {inner}"),
        other => format!("invalid request body: {other}"),
    };
    debug!(error = %err, "rejected JSON payload");
    Error::invalid_request(message).with_details(json!({
        "field": "body",
        "code": ErrorCode::InvalidBody.as_str(),
    }))
}

fn invalid_query_error(err: &QueryPayloadError) -> Error {
    debug!(error = %err, "rejected query string");
    Error::invalid_request(format!("invalid query string: {err}")).with_details(json!({
        "field": "query",
        "code": ErrorCode::InvalidQuery.as_str(),
    }))
}

/// Reject a path identifier that is not an integer.
pub(crate) fn invalid_path_error(value: &str) -> Error {
    debug!(value, "rejected path parameter");
    ValidationError::new("id", "id must be an integer").with_value(ErrorCode::InvalidPath, value)
}

/// Fold several field failures into one error.
///
/// The first failure keeps its place at the top of `details` and
/// `details.errors` carries all of them in order.
pub(crate) fn combine_validation_errors(
    first: Error,
    rest: impl IntoIterator<Item = Error>,
) -> Error {
    let rest: Vec<Error> = rest.into_iter().collect();
    if rest.is_empty() {
        return first;
    }
    let all = || std::iter::once(&first).chain(rest.iter());
    let message = all().map(Error::message).collect::<Vec<_>>().join("; ");
    let entries: Vec<Value> = all().filter_map(|err| err.details().cloned()).collect();
    let mut details = first.details().cloned().unwrap_or_else(|| json!({}));
    if let Some(map) = details.as_object_mut() {
        map.insert("errors".to_owned(), Value::Array(entries));
    }
    Error::invalid_request(message).with_details(details)
}

/// JSON extractor config mapping payload failures onto 422 responses.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| invalid_json_error(&err).into())
}

/// Query extractor config mapping parse failures onto 422 responses.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| invalid_query_error(&err).into())
}
