// MySQL persistence for products and their category links
//
// Implements:
// - Paged product search filtered by category and name
// - Batched category loading for a page of products
// - Insert/overwrite of the product row and its links in one transaction
// - Delete with foreign-key conflict detection

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{MySql, MySqlPool, QueryBuilder, Transaction};

use crate::core::error::{StoreError, StoreResult};
use crate::core::pagination::{Page, PageRequest};
use crate::core::traits::EntityStore;
use crate::core::types::DbId;
use crate::modules::categories::models::Category;
use crate::modules::categories::repositories::MySqlCategoryRepository;
use crate::modules::products::models::{Product, ProductFilter};

/// Store contract consumed by the product service
pub type ProductStore = dyn EntityStore<Product, Filter = ProductFilter>;

/// Columns accepted by `?sort=` on product listings
pub const PRODUCT_SORTABLE: &[&str] = &["id", "name", "price", "date"];

const ENTITY: &str = "Product";

const FILTER: &str = r#"
    WHERE (? IS NULL OR id IN (SELECT product_id FROM tb_product_category WHERE category_id = ?))
      AND (? IS NULL OR LOWER(name) LIKE CONCAT('%', LOWER(?), '%'))
"#;

/// Row shape for the category links of a page of products
#[derive(Debug, sqlx::FromRow)]
struct ProductCategoryRow {
    product_id: DbId,
    id: Option<DbId>,
    name: String,
}

/// MySQL-backed product store
#[derive(Clone)]
pub struct MySqlProductRepository {
    pool: MySqlPool,
}

impl MySqlProductRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Fetch the categories of several products with a single query
    async fn load_categories(&self, products: &mut [Product]) -> StoreResult<()> {
        let ids: Vec<DbId> = products.iter().filter_map(|p| p.id).collect();
        if ids.is_empty() {
            return Ok(());
        }

        let mut builder: QueryBuilder<MySql> = QueryBuilder::new(
            "SELECT pc.product_id, c.id, c.name \
             FROM tb_product_category pc \
             INNER JOIN tb_category c ON c.id = pc.category_id \
             WHERE pc.product_id IN (",
        );
        let mut separated = builder.separated(", ");
        for id in &ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY c.name");

        let rows = builder
            .build_query_as::<ProductCategoryRow>()
            .fetch_all(&self.pool)
            .await?;

        let mut by_product: HashMap<DbId, Vec<Category>> = HashMap::new();
        for row in rows {
            by_product.entry(row.product_id).or_default().push(Category {
                id: row.id,
                name: row.name,
            });
        }

        for product in products.iter_mut() {
            if let Some(categories) = product.id.and_then(|id| by_product.remove(&id)) {
                product.set_categories(categories);
            }
        }
        Ok(())
    }

    async fn find_row(&self, id: DbId) -> StoreResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, img_url, date
            FROM tb_product
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Replace the category links of a product within a transaction
    async fn write_links(
        tx: &mut Transaction<'_, MySql>,
        product_id: DbId,
        categories: &[Category],
    ) -> StoreResult<()> {
        sqlx::query("DELETE FROM tb_product_category WHERE product_id = ?")
            .bind(product_id)
            .execute(&mut **tx)
            .await?;

        for category_id in categories.iter().filter_map(|c| c.id) {
            sqlx::query("INSERT INTO tb_product_category (product_id, category_id) VALUES (?, ?)")
                .bind(product_id)
                .bind(category_id)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl EntityStore<Product> for MySqlProductRepository {
    type Filter = ProductFilter;

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Product>> {
        let Some(mut product) = self.find_row(id).await? else {
            return Ok(None);
        };

        let categories = MySqlCategoryRepository::find_by_product(&self.pool, id).await?;
        product.set_categories(categories);

        Ok(Some(product))
    }

    async fn find_all_paged(
        &self,
        filter: &ProductFilter,
        page: &PageRequest,
    ) -> StoreResult<Page<Product>> {
        let name = filter.name.as_deref().map(str::trim).filter(|n| !n.is_empty());

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM tb_product {FILTER}"))
            .bind(filter.category_id)
            .bind(filter.category_id)
            .bind(name)
            .bind(name)
            .fetch_one(&self.pool)
            .await?;

        let query = format!(
            "SELECT id, name, description, price, img_url, date FROM tb_product {} {} LIMIT ? OFFSET ?",
            FILTER,
            page.order_by("name")
        );
        let mut products = sqlx::query_as::<_, Product>(&query)
            .bind(filter.category_id)
            .bind(filter.category_id)
            .bind(name)
            .bind(name)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        self.load_categories(&mut products).await?;

        Ok(Page::new(products, page, total.max(0) as u64))
    }

    async fn save(&self, entity: Product) -> StoreResult<Product> {
        let mut tx = self.pool.begin().await?;

        let id = match entity.id {
            None => {
                let result = sqlx::query(
                    r#"
                    INSERT INTO tb_product (name, description, price, img_url, date)
                    VALUES (?, ?, ?, ?, ?)
                    "#,
                )
                .bind(&entity.name)
                .bind(&entity.description)
                .bind(entity.price)
                .bind(&entity.img_url)
                .bind(entity.date)
                .execute(&mut *tx)
                .await?;

                result.last_insert_id() as DbId
            }
            Some(id) => {
                let locked: Option<DbId> =
                    sqlx::query_scalar("SELECT id FROM tb_product WHERE id = ? FOR UPDATE")
                        .bind(id)
                        .fetch_optional(&mut *tx)
                        .await?;
                if locked.is_none() {
                    return Err(StoreError::RowAbsent { entity: ENTITY, id });
                }

                sqlx::query(
                    r#"
                    UPDATE tb_product
                    SET name = ?, description = ?, price = ?, img_url = ?, date = ?
                    WHERE id = ?
                    "#,
                )
                .bind(&entity.name)
                .bind(&entity.description)
                .bind(entity.price)
                .bind(&entity.img_url)
                .bind(entity.date)
                .bind(id)
                .execute(&mut *tx)
                .await?;

                id
            }
        };

        Self::write_links(&mut tx, id, &entity.categories).await?;
        tx.commit().await?;

        Ok(Product {
            id: Some(id),
            ..entity
        })
    }

    async fn delete_by_id(&self, id: DbId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM tb_product WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RowAbsent { entity: ENTITY, id });
        }
        Ok(())
    }

    async fn get_reference(&self, id: DbId) -> StoreResult<Product> {
        self.find_row(id)
            .await?
            .ok_or(StoreError::RowAbsent { entity: ENTITY, id })
    }
}
