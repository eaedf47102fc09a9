// src/database.rs
//
// Database pool creation. The pool is built once at startup from the
// configured DB_* parts, and the embedded migrations run before the pool
// is handed back to the application.

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::Config;

/// Create the Postgres connection pool and run embedded migrations.
pub async fn create_pool(config: &Config) -> Result<PgPool, Box<dyn std::error::Error>> {
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .connect(&config.database_url())
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
