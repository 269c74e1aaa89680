//! Router assembly.

mod common;
mod turkey;

pub use common::common_routes;
pub use turkey::turkey_routes;

use crate::state::AppState;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

/// Full application: common routes plus turkey CRUD, with a request body cap.
pub fn app(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(turkey_routes(state))
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
}
