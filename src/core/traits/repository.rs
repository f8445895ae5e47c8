use async_trait::async_trait;

use crate::core::error::StoreResult;
use crate::core::pagination::{Page, PageRequest};
use crate::core::types::DbId;

/// Persistence contract shared by every entity type.
///
/// Services receive stores as `Arc<dyn EntityStore<T, Filter = F>>`, so the
/// MySQL implementations and the in-memory test doubles are interchangeable.
#[async_trait]
pub trait EntityStore<T>: Send + Sync {
    /// Query parameters accepted by `find_all_paged`
    type Filter: Send + Sync;

    /// Find entity by ID
    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<T>>;

    /// Filtered, paginated query
    async fn find_all_paged(&self, filter: &Self::Filter, page: &PageRequest)
        -> StoreResult<Page<T>>;

    /// Insert when the entity has no id, overwrite the row otherwise.
    ///
    /// Overwriting a row that no longer exists fails with `StoreError::RowAbsent`.
    async fn save(&self, entity: T) -> StoreResult<T>;

    /// Delete by ID.
    ///
    /// Fails with `StoreError::RowAbsent` when no row matched and with
    /// `StoreError::IntegrityViolation` when other rows still reference it.
    async fn delete_by_id(&self, id: DbId) -> StoreResult<()>;

    /// Load the lightweight form of an entity for relation wiring.
    ///
    /// Fails with `StoreError::RowAbsent` when the id is invalid.
    async fn get_reference(&self, id: DbId) -> StoreResult<T>;
}
