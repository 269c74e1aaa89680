//! Turkey API: CRUD REST service for turkey documents with a single error translator.

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::{AppError, Classification, ConfigError, ErrorKind, StoreError};
pub use model::{NewTurkey, Turkey, TurkeyBody, TurkeyPatch};
pub use routes::{app, common_routes, turkey_routes};
pub use state::AppState;
pub use store::{ensure_database_exists, MemoryTurkeyStore, PgTurkeyStore, TurkeyStore};
