use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::error::{StoreError, StoreResult};
use crate::core::pagination::{Page, PageRequest};
use crate::core::traits::EntityStore;
use crate::core::types::DbId;
use crate::modules::roles::models::{Role, RoleFilter};

/// Store contract consumed by the role service
pub type RoleStore = dyn EntityStore<Role, Filter = RoleFilter>;

/// Columns accepted by `?sort=` on role listings
pub const ROLE_SORTABLE: &[&str] = &["id", "authority"];

const ENTITY: &str = "Role";

/// MySQL-backed role store
#[derive(Clone)]
pub struct MySqlRoleRepository {
    pool: MySqlPool,
}

impl MySqlRoleRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Load every role granted to a user
    pub async fn find_by_user(pool: &MySqlPool, user_id: DbId) -> StoreResult<Vec<Role>> {
        let roles = sqlx::query_as::<_, Role>(
            r#"
            SELECT r.id, r.authority
            FROM tb_role r
            INNER JOIN tb_user_role ur ON ur.role_id = r.id
            WHERE ur.user_id = ?
            ORDER BY r.authority
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(roles)
    }
}

#[async_trait]
impl EntityStore<Role> for MySqlRoleRepository {
    type Filter = RoleFilter;

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Role>> {
        let role = sqlx::query_as::<_, Role>("SELECT id, authority FROM tb_role WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(role)
    }

    async fn find_all_paged(&self, filter: &RoleFilter, page: &PageRequest) -> StoreResult<Page<Role>> {
        let authority = filter
            .authority
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty());

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tb_role WHERE (? IS NULL OR authority LIKE CONCAT('%', ?, '%'))",
        )
        .bind(authority)
        .bind(authority)
        .fetch_one(&self.pool)
        .await?;

        let query = format!(
            "SELECT id, authority FROM tb_role \
             WHERE (? IS NULL OR authority LIKE CONCAT('%', ?, '%')) {} LIMIT ? OFFSET ?",
            page.order_by("authority")
        );
        let roles = sqlx::query_as::<_, Role>(&query)
            .bind(authority)
            .bind(authority)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(roles, page, total.max(0) as u64))
    }

    async fn save(&self, entity: Role) -> StoreResult<Role> {
        match entity.id {
            None => {
                let result = sqlx::query("INSERT INTO tb_role (authority) VALUES (?)")
                    .bind(&entity.authority)
                    .execute(&self.pool)
                    .await?;

                Ok(Role {
                    id: Some(result.last_insert_id() as DbId),
                    ..entity
                })
            }
            Some(id) => {
                let mut tx = self.pool.begin().await?;

                let locked: Option<DbId> =
                    sqlx::query_scalar("SELECT id FROM tb_role WHERE id = ? FOR UPDATE")
                        .bind(id)
                        .fetch_optional(&mut *tx)
                        .await?;
                if locked.is_none() {
                    return Err(StoreError::RowAbsent { entity: ENTITY, id });
                }

                sqlx::query("UPDATE tb_role SET authority = ? WHERE id = ?")
                    .bind(&entity.authority)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;

                tx.commit().await?;
                Ok(entity)
            }
        }
    }

    async fn delete_by_id(&self, id: DbId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM tb_role WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RowAbsent { entity: ENTITY, id });
        }
        Ok(())
    }

    async fn get_reference(&self, id: DbId) -> StoreResult<Role> {
        self.find_by_id(id)
            .await?
            .ok_or(StoreError::RowAbsent { entity: ENTITY, id })
    }
}
