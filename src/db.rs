use sqlx::{postgres::PgPoolOptions, PgPool};

/// Opens the connection pool. The handle is passed to whatever needs
/// persistence via `web::Data`; nothing in the crate reaches for a global.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}

/// Applies the embedded migrations in `./migrations`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
