//! Shared application state for all routes. Holds no per-request data.

use crate::store::TurkeyStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TurkeyStore>,
}

impl AppState {
    pub fn new<S: TurkeyStore + 'static>(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}
