// src/main.rs
mod auth;
mod config;
mod database;
mod dtos;
mod error;
mod export;
mod handlers;
mod middleware;
mod models;
mod routes;
mod state;

use axum::{routing::get, Router};
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing_subscriber::fmt::init as tracing_init;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_init();

    // Load environment variables
    dotenv().ok();

    // Configuration is read once; a missing database variable aborts startup
    // instead of falling back to defaults.
    let config = match config::Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    };

    // Create database pool and run migrations
    let db_pool = database::create_pool(&config)
        .await
        .expect("Failed to create database pool");

    // Create application state
    let app_state = state::AppState::new(db_pool, config.jwt_secret.clone());

    let app = Router::new()
        .merge(routes::create_router(app_state.clone()))
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr = SocketAddr::from((config.host, config.port));
    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");
    tracing::info!("Server running on {}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error=%e, "Server error");
    }
}

async fn health_check() -> &'static str {
    "OK"
}
