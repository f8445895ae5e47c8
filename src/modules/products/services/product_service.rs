use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::core::pagination::{Page, PageRequest};
use crate::core::types::DbId;
use crate::modules::categories::models::Category;
use crate::modules::categories::repositories::CategoryStore;
use crate::modules::products::models::{Product, ProductDto, ProductFilter};
use crate::modules::products::repositories::ProductStore;

const ENTITY: &str = "Product";
const CATEGORY: &str = "Category";

/// Service for product business logic
pub struct ProductService {
    repository: Arc<ProductStore>,
    category_repository: Arc<CategoryStore>,
}

impl ProductService {
    pub fn new(repository: Arc<ProductStore>, category_repository: Arc<CategoryStore>) -> Self {
        Self {
            repository,
            category_repository,
        }
    }

    pub async fn find_all_paged(
        &self,
        filter: &ProductFilter,
        page: &PageRequest,
    ) -> Result<Page<ProductDto>> {
        let products = self.repository.find_all_paged(filter, page).await?;
        Ok(products.map(ProductDto::from))
    }

    pub async fn find_by_id(&self, id: DbId) -> Result<ProductDto> {
        let product = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(ENTITY, id))?;

        Ok(ProductDto::from(product))
    }

    /// Create a product. Any client-supplied id is ignored.
    pub async fn insert(&self, dto: ProductDto) -> Result<ProductDto> {
        let product = self.build_entity(&dto).await?;
        let product = self
            .repository
            .save(product)
            .await
            .map_err(|e| AppError::from_save(e, CATEGORY))?;

        tracing::info!(product_id = ?product.id, "Product created");
        Ok(ProductDto::from(product))
    }

    /// Overwrite an existing product and its category set. Never creates a missing one.
    pub async fn update(&self, id: DbId, dto: ProductDto) -> Result<ProductDto> {
        if self.repository.find_by_id(id).await?.is_none() {
            return Err(AppError::not_found(ENTITY, id));
        }

        let mut product = self.build_entity(&dto).await?;
        product.id = Some(id);
        let product = self
            .repository
            .save(product)
            .await
            .map_err(|e| AppError::from_save(e, CATEGORY))?;

        tracing::info!(product_id = id, "Product updated");
        Ok(ProductDto::from(product))
    }

    pub async fn delete(&self, id: DbId) -> Result<()> {
        self.repository
            .delete_by_id(id)
            .await
            .map_err(|e| AppError::from_delete(e, ENTITY, id))?;

        tracing::info!(product_id = id, "Product deleted");
        Ok(())
    }

    /// Copy the mutable fields and resolve every referenced category
    async fn build_entity(&self, dto: &ProductDto) -> Result<Product> {
        let mut product = dto.to_entity();

        let mut categories: Vec<Category> = Vec::new();
        for category_id in dto.category_ids()? {
            let category = self
                .category_repository
                .get_reference(category_id)
                .await
                .map_err(AppError::from_reference)?;
            categories.push(category);
        }
        product.set_categories(categories);

        Ok(product)
    }
}
