pub mod dashboard;
pub mod products;
pub mod reports;
pub mod sales;
pub mod users;

use axum::Router;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(users::routes(state.clone()))
        .merge(products::routes(state.clone()))
        .merge(sales::routes(state.clone()))
        .merge(reports::routes(state.clone()))
        .merge(dashboard::routes(state))
}
