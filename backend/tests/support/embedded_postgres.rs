//! Database provisioning helpers for the embedded PostgreSQL cluster.
//!
//! Database reset goes through `postgres` so `DROP DATABASE` runs outside any
//! transaction. Schema setup reuses the crate's embedded Diesel migrations.

use household_notes::outbound::persistence::{MigrationError, run_migrations};
use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};

use super::format_postgres_error;

const MAINTENANCE_DB: &str = "postgres";

/// Drop and recreate `name` so each suite starts from an empty database.
pub fn reset_database(cluster: &TestCluster, name: &str) -> Result<(), String> {
    let url = cluster.connection().database_url(MAINTENANCE_DB);
    let mut client = Client::connect(&url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(&format!(r#"DROP DATABASE IF EXISTS "{name}""#))
        .map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(&format!(r#"CREATE DATABASE "{name}""#))
        .map_err(|err| format_postgres_error(&err))?;
    Ok(())
}

/// Apply the embedded migrations to the database at `url`.
pub fn migrate_schema(url: &str) -> Result<Vec<String>, MigrationError> {
    run_migrations(url)
}

/// Execute raw SQL, e.g. to simulate schema loss.
pub fn execute_sql(url: &str, sql: &str) -> Result<(), String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(sql)
        .map_err(|err| format_postgres_error(&err))
}
