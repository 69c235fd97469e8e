//! Internal Diesel row types for the notes table.
//!
//! These types map directly to rows and are never exposed to the domain.
//! Conversion into domain values happens in the repository adapter.

use std::io::Write;

use chrono::{DateTime, Utc};
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};

use crate::domain::Author;

use super::schema::notes;
use super::schema::sql_types::AuthorEnum;

/// Column value for the `author_enum` PostgreSQL type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsExpression, FromSqlRow)]
#[diesel(sql_type = AuthorEnum)]
pub(crate) struct AuthorColumn(pub Author);

impl ToSql<AuthorEnum, Pg> for AuthorColumn {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.0.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<AuthorEnum, Pg> for AuthorColumn {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        let label = std::str::from_utf8(bytes.as_bytes())?;
        let author = label.parse::<Author>()?;
        Ok(Self(author))
    }
}

/// Row struct for reading from the notes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NoteRow {
    pub id: i32,
    pub author: AuthorColumn,
    pub title: String,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating notes.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notes)]
pub(crate) struct NewNoteRow<'a> {
    pub author: AuthorColumn,
    pub title: &'a str,
    pub body: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for partial note updates.
///
/// `None` skips a column; `Some(None)` writes `NULL` to the nullable body.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = notes)]
pub(crate) struct NoteChangesetRow<'a> {
    pub title: Option<&'a str>,
    pub body: Option<Option<&'a str>>,
    pub updated_at: DateTime<Utc>,
}
