use super::error::{AppError, Result};

/// All primary keys are MySQL `BIGINT AUTO_INCREMENT`.
pub type DbId = i64;

/// `Location` path of a freshly saved resource, e.g. `/products/5`.
///
/// Stores assign the id on save, so a missing one is a server fault.
pub fn resource_location(collection: &str, id: Option<DbId>) -> Result<String> {
    id.map(|id| format!("/{}/{}", collection, id))
        .ok_or_else(|| AppError::internal(format!("Saved {} row came back without an id", collection)))
}
