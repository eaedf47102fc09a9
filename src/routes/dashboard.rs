use axum::{middleware, routing::get, Router};

use crate::handlers::dashboard::{get_dashboard, get_dashboard_chart, get_dashboard_data};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/data", get(get_dashboard_data))
        .route("/dashboard/chart", get(get_dashboard_chart))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
