use axum::{middleware, routing::get, Router};

use crate::handlers::report::{export_report, get_report_chart, get_series, get_summary};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/reports/summary", get(get_summary))
        .route("/reports/series", get(get_series))
        .route("/reports/chart", get(get_report_chart))
        .route("/reports/export/{format}", get(export_report))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
