use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::core::pagination::{Page, PageRequest};
use crate::core::types::DbId;
use crate::modules::categories::models::{CategoryDto, CategoryFilter};
use crate::modules::categories::repositories::CategoryStore;

const ENTITY: &str = "Category";

/// Service for category business logic
pub struct CategoryService {
    repository: Arc<CategoryStore>,
}

impl CategoryService {
    pub fn new(repository: Arc<CategoryStore>) -> Self {
        Self { repository }
    }

    pub async fn find_all_paged(
        &self,
        filter: &CategoryFilter,
        page: &PageRequest,
    ) -> Result<Page<CategoryDto>> {
        let categories = self.repository.find_all_paged(filter, page).await?;
        Ok(categories.map(CategoryDto::from))
    }

    pub async fn find_by_id(&self, id: DbId) -> Result<CategoryDto> {
        let category = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(ENTITY, id))?;

        Ok(CategoryDto::from(category))
    }

    pub async fn insert(&self, dto: CategoryDto) -> Result<CategoryDto> {
        let category = self.repository.save(dto.to_entity()).await?;

        tracing::info!(category_id = ?category.id, "Category created");
        Ok(CategoryDto::from(category))
    }

    /// Overwrite an existing category. Never creates a missing one.
    pub async fn update(&self, id: DbId, dto: CategoryDto) -> Result<CategoryDto> {
        if self.repository.find_by_id(id).await?.is_none() {
            return Err(AppError::not_found(ENTITY, id));
        }

        let mut category = dto.to_entity();
        category.id = Some(id);
        let category = self.repository.save(category).await?;

        tracing::info!(category_id = id, "Category updated");
        Ok(CategoryDto::from(category))
    }

    pub async fn delete(&self, id: DbId) -> Result<()> {
        self.repository
            .delete_by_id(id)
            .await
            .map_err(|e| AppError::from_delete(e, ENTITY, id))?;

        tracing::info!(category_id = id, "Category deleted");
        Ok(())
    }
}
