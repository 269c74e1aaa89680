//! Turkey CRUD routes. The id segment is optional: id-less reads return the first
//! turkey, id-less writes are rejected with 400.

use crate::handlers::turkey::{
    create, delete as delete_handler, delete_without_id, read, read_first, update, update_without_id,
};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn turkey_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/turkey",
            get(read_first).post(create).put(update_without_id).delete(delete_without_id),
        )
        .route(
            "/api/turkey/",
            get(read_first).post(create).put(update_without_id).delete(delete_without_id),
        )
        .route("/api/turkey/:id", get(read).put(update).delete(delete_handler))
        .with_state(state)
}
