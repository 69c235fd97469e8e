//! Household notes backend.
//!
//! A small CRUD service for short notes written by two household members.
//! The crate follows a hexagonal layout: `domain` holds the note types,
//! ports and service; `inbound::http` exposes them over Actix; and
//! `outbound::persistence` stores them in PostgreSQL through Diesel.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
