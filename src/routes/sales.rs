use axum::{middleware, routing::get, Router};

use crate::handlers::sale::{create_sale, list_sales};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/sales", get(list_sales).post(create_sale))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
