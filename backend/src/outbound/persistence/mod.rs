//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Provides the [`DieselNoteRepository`] implementation of the domain's
//! note repository port, backed by `diesel-async` with `bb8` pooling, and
//! the embedded schema migrations applied at startup.
//!
//! Diesel row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module; only domain types cross the boundary.
//!
//! # Example
//!
//! ```ignore
//! use household_notes::outbound::persistence::{DbPool, DieselNoteRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/notes")).await?;
//! let repo = DieselNoteRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_note_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_note_repository::DieselNoteRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
