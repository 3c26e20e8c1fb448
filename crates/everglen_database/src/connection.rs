//! Database connection utilities.

use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use everglen_error::{DatabaseError, DatabaseErrorKind};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Establish a connection to the PostgreSQL database.
///
/// Uses `url` when given, otherwise the `DATABASE_URL` environment variable.
///
/// # Errors
///
/// Returns an error if no URL is available or the connection fails.
pub fn establish_connection(url: Option<&str>) -> Result<PgConnection, DatabaseError> {
    let database_url = match url {
        Some(url) => url.to_string(),
        None => std::env::var("DATABASE_URL").map_err(|_| {
            DatabaseError::new(DatabaseErrorKind::Connection(
                "DATABASE_URL environment variable not set".to_string(),
            ))
        })?,
    };

    PgConnection::establish(&database_url).map_err(DatabaseError::from)
}

/// Run pending migrations.
pub fn run_migrations(conn: &mut PgConnection) -> Result<(), DatabaseError> {
    conn.run_pending_migrations(MIGRATIONS)
        .map(|_| ())
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Migration(e.to_string())))
}
