use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::error::{StoreError, StoreResult};
use crate::core::pagination::{Page, PageRequest};
use crate::core::traits::EntityStore;
use crate::core::types::DbId;
use crate::modules::categories::models::{Category, CategoryFilter};

/// Store contract consumed by the category service
pub type CategoryStore = dyn EntityStore<Category, Filter = CategoryFilter>;

/// Columns accepted by `?sort=` on category listings
pub const CATEGORY_SORTABLE: &[&str] = &["id", "name"];

const ENTITY: &str = "Category";

/// MySQL-backed category store
#[derive(Clone)]
pub struct MySqlCategoryRepository {
    pool: MySqlPool,
}

impl MySqlCategoryRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Load every category linked to a product
    pub async fn find_by_product(pool: &MySqlPool, product_id: DbId) -> StoreResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT c.id, c.name
            FROM tb_category c
            INNER JOIN tb_product_category pc ON pc.category_id = c.id
            WHERE pc.product_id = ?
            ORDER BY c.name
            "#,
        )
        .bind(product_id)
        .fetch_all(pool)
        .await?;

        Ok(categories)
    }
}

#[async_trait]
impl EntityStore<Category> for MySqlCategoryRepository {
    type Filter = CategoryFilter;

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name
            FROM tb_category
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn find_all_paged(
        &self,
        filter: &CategoryFilter,
        page: &PageRequest,
    ) -> StoreResult<Page<Category>> {
        let name = filter.name.as_deref().map(str::trim).filter(|n| !n.is_empty());

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM tb_category
            WHERE (? IS NULL OR LOWER(name) LIKE CONCAT('%', LOWER(?), '%'))
            "#,
        )
        .bind(name)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        let query = format!(
            r#"
            SELECT id, name
            FROM tb_category
            WHERE (? IS NULL OR LOWER(name) LIKE CONCAT('%', LOWER(?), '%'))
            {}
            LIMIT ? OFFSET ?
            "#,
            page.order_by("name")
        );
        let categories = sqlx::query_as::<_, Category>(&query)
            .bind(name)
            .bind(name)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(categories, page, total.max(0) as u64))
    }

    async fn save(&self, entity: Category) -> StoreResult<Category> {
        match entity.id {
            None => {
                let result = sqlx::query("INSERT INTO tb_category (name) VALUES (?)")
                    .bind(&entity.name)
                    .execute(&self.pool)
                    .await?;

                Ok(Category {
                    id: Some(result.last_insert_id() as DbId),
                    ..entity
                })
            }
            Some(id) => {
                let mut tx = self.pool.begin().await?;

                let locked: Option<DbId> =
                    sqlx::query_scalar("SELECT id FROM tb_category WHERE id = ? FOR UPDATE")
                        .bind(id)
                        .fetch_optional(&mut *tx)
                        .await?;
                if locked.is_none() {
                    return Err(StoreError::RowAbsent { entity: ENTITY, id });
                }

                sqlx::query("UPDATE tb_category SET name = ? WHERE id = ?")
                    .bind(&entity.name)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;

                tx.commit().await?;
                Ok(entity)
            }
        }
    }

    async fn delete_by_id(&self, id: DbId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM tb_category WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RowAbsent { entity: ENTITY, id });
        }
        Ok(())
    }

    async fn get_reference(&self, id: DbId) -> StoreResult<Category> {
        self.find_by_id(id)
            .await?
            .ok_or(StoreError::RowAbsent { entity: ENTITY, id })
    }
}
