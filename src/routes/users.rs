use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::handlers::user::{change_password, get_me, login_user};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let open = Router::new().route("/users/login", post(login_user));

    let protected = Router::new()
        .route("/users/me", get(get_me))
        .route("/users/change-password", post(change_password))
        .layer(middleware::from_fn_with_state(state, require_auth));

    open.merge(protected)
}
