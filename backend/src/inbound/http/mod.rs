//! HTTP inbound adapter exposing the notes REST endpoints.

pub mod error;
pub mod health;
pub mod notes;
pub mod schemas;
pub mod state;
pub mod validation;

pub use error::ApiResult;
