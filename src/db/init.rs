use crate::db::{DatabaseConnection, DatabaseKind, Db};
use std::env;

/// Database url used when neither a cli argument nor `DATABASE_URL` is given.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://habr.sqlite3?mode=rwc";

/// Resolve the database url.
/// An explicit url wins, then the `DATABASE_URL` environment variable,
/// then a local `SQLite` file.
#[must_use]
pub fn database_url(explicit: Option<&str>) -> String {
    explicit.map_or_else(
        || env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_owned()),
        ToOwned::to_owned,
    )
}

/// Connects to a database and applies migrations.
/// We use `SQLite` by default, but we can override this by setting the `DATABASE_URL` environment variable.
///
/// # Errors
/// Errors if connection to database fails.
/// Connections can fail if the database is not running, or if the database URL is invalid.
pub async fn connect(db_url: &str) -> anyhow::Result<DatabaseConnection> {
    let connection = DatabaseConnection::connect(db_url).await?;
    tracing::info!("Connected to database");
    migrate(&connection).await?;
    Ok(connection)
}

/// Apply the schema migrations matching the database kind.
///
/// # Errors
/// Errors if a migration fails to apply.
pub async fn migrate(connection: &DatabaseConnection) -> anyhow::Result<()> {
    match connection.kind {
        DatabaseKind::Sqlite => {
            sqlx::migrate!("./migrations/sqlite")
                .run(&connection.pool)
                .await?;
        }
        DatabaseKind::Postgres => {
            sqlx::migrate!("./migrations/postgres")
                .run(&connection.pool)
                .await?;
        }
    }
    tracing::info!(kind = ?connection.kind, "Applied database migrations");
    Ok(())
}
