use anyhow::Result;
use sqlx::PgPool;

/// Apply pending migrations and return how many the binary ships with.
pub async fn run_migrations(pool: &PgPool) -> Result<usize> {
    let migrator = sqlx::migrate!("./migrations");
    migrator.run(pool).await?;
    tracing::debug!("Database migrations are up to date");
    Ok(migrator.iter().count())
}
