//! Axum router wiring.
//!
//! Binds the counting handler to the configured route (analogous to a
//! `count` directive on a location) plus the operational endpoints.

use axum::{routing::get, Router};

use crate::{app_state::AppState, count, ops};

pub fn build_router(state: AppState) -> Router {
    let route = state.cfg().counter.route.clone();
    Router::new()
        .route(&route, get(count::count))
        .route("/healthz", get(ops::healthz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
