//! API routing.

mod health;
mod portfolios;
mod stream;
mod technologies;

use std::sync::Arc;

use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use crate::auth::require_bearer;
use crate::main_lib::AppState;

/// Builds the application router.
///
/// Everything under `/api/v1` sits behind the (optional) bearer-token
/// middleware; the health probe stays open for liveness checks.
pub fn app_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(portfolios::router())
        .merge(technologies::router())
        .merge(stream::router())
        .layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    Router::new()
        .nest("/api/v1", api)
        .merge(health::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
