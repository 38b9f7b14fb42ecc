//! # Database Persistence Layer
//!
//! Postgres persistence for evidence records via SQLx.
//!
//! The database layer is **optional**. When `DATABASE_URL` is set, evidence
//! records are persisted to the `evidence` table and survive restarts. When
//! absent, the API runs against the in-memory repository (suitable for
//! development and testing; records are lost on restart).

pub mod evidence;

use sqlx::postgres::{PgPool, PgPoolOptions};

pub use evidence::PgEvidenceRepository;

/// Initialize the database connection pool and run migrations.
///
/// Returns `None` if `DATABASE_URL` is not set (in-memory-only mode).
/// Returns `Err` if the URL is set but the connection or migration fails.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!(
                "DATABASE_URL not set — running with the in-memory repository. \
                 Evidence records will not survive restarts."
            );
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(&url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}
