//! Turkey persistence: the store trait and its PostgreSQL and in-memory backends.

mod memory;
mod postgres;

pub use memory::MemoryTurkeyStore;
pub use postgres::{ensure_database_exists, PgTurkeyStore};

use crate::error::StoreError;
use crate::model::{NewTurkey, Turkey, TurkeyPatch};
use async_trait::async_trait;

/// Document-store operations used by the HTTP handlers.
///
/// Ids arrive as raw path text; the store owns their format and reports malformed
/// ids as [`StoreError::InvalidId`].
#[async_trait]
pub trait TurkeyStore: Send + Sync {
    /// Prepare storage (tables, indexes). Safe to call before every write.
    async fn init(&self) -> Result<(), StoreError>;

    /// Validate and insert a new document, assigning its id.
    async fn save(&self, draft: NewTurkey) -> Result<Turkey, StoreError>;

    /// Fetch by id, or the first stored document when no id is given.
    async fn find_one(&self, id: Option<&str>) -> Result<Option<Turkey>, StoreError>;

    /// Validate the patch, apply it and return the updated document.
    async fn update_by_id(&self, id: &str, patch: TurkeyPatch) -> Result<Option<Turkey>, StoreError>;

    /// Remove by id, returning the removed document if there was one.
    async fn remove_by_id(&self, id: &str) -> Result<Option<Turkey>, StoreError>;

    /// Cheap liveness probe for readiness checks.
    async fn ping(&self) -> Result<(), StoreError>;
}
