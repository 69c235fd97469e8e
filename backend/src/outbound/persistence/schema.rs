//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

pub mod sql_types {
    /// PostgreSQL `author_enum` type holding the permitted note authors.
    #[derive(diesel::query_builder::QueryId, diesel::sql_types::SqlType)]
    #[diesel(postgres_type(name = "author_enum"))]
    pub struct AuthorEnum;
}

diesel::table! {
    use diesel::sql_types::*;
    use super::sql_types::AuthorEnum;

    /// Household notes.
    notes (id) {
        /// Serial primary key.
        id -> Int4,
        author -> AuthorEnum,
        /// Trimmed title, at most 255 characters.
        title -> Varchar,
        body -> Nullable<Text>,
        created_at -> Timestamptz,
        /// Never earlier than `created_at` (enforced by a CHECK constraint).
        updated_at -> Timestamptz,
    }
}
