// src/state.rs
//
// Shared application state handed to every handler via axum's `State`
// extractor. The JWT secret lives here (resolved once at startup) rather
// than being re-read from the environment on each request.

use sqlx::postgres::PgPool;

/// Application state shared across all requests.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
}

impl AppState {
    /// Construct the shared state from a connection pool and JWT secret.
    pub fn new(db_pool: PgPool, jwt_secret: String) -> Self {
        AppState {
            db_pool,
            jwt_secret,
        }
    }
}
