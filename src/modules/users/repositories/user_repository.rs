use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{MySql, MySqlPool, QueryBuilder, Transaction};

use crate::core::error::{StoreError, StoreResult};
use crate::core::pagination::{Page, PageRequest};
use crate::core::traits::EntityStore;
use crate::core::types::DbId;
use crate::modules::roles::models::Role;
use crate::modules::roles::repositories::MySqlRoleRepository;
use crate::modules::users::models::{User, UserFilter};

/// Columns accepted by `?sort=` on user listings
pub const USER_SORTABLE: &[&str] = &["id", "first_name", "last_name", "email"];

const ENTITY: &str = "User";

const COLUMNS: &str = "id, first_name, last_name, email, password";

/// User store: the generic contract plus the email lookup used for uniqueness checks
#[async_trait]
pub trait UserRepository: EntityStore<User, Filter = UserFilter> {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;
}

#[derive(Debug, sqlx::FromRow)]
struct UserRoleRow {
    user_id: DbId,
    id: Option<DbId>,
    authority: String,
}

/// MySQL-backed user store
#[derive(Clone)]
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn load_roles(&self, users: &mut [User]) -> StoreResult<()> {
        let ids: Vec<DbId> = users.iter().filter_map(|u| u.id).collect();
        if ids.is_empty() {
            return Ok(());
        }

        let mut builder: QueryBuilder<MySql> = QueryBuilder::new(
            "SELECT ur.user_id, r.id, r.authority \
             FROM tb_user_role ur \
             INNER JOIN tb_role r ON r.id = ur.role_id \
             WHERE ur.user_id IN (",
        );
        let mut separated = builder.separated(", ");
        for id in &ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY r.authority");

        let rows = builder
            .build_query_as::<UserRoleRow>()
            .fetch_all(&self.pool)
            .await?;

        let mut by_user: HashMap<DbId, Vec<Role>> = HashMap::new();
        for row in rows {
            by_user.entry(row.user_id).or_default().push(Role {
                id: row.id,
                authority: row.authority,
            });
        }

        for user in users.iter_mut() {
            if let Some(roles) = user.id.and_then(|id| by_user.remove(&id)) {
                user.set_roles(roles);
            }
        }
        Ok(())
    }

    async fn find_row(&self, id: DbId) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM tb_user WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn write_roles(
        tx: &mut Transaction<'_, MySql>,
        user_id: DbId,
        roles: &[Role],
    ) -> StoreResult<()> {
        sqlx::query("DELETE FROM tb_user_role WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut **tx)
            .await?;

        for role_id in roles.iter().filter_map(|r| r.id) {
            sqlx::query("INSERT INTO tb_user_role (user_id, role_id) VALUES (?, ?)")
                .bind(user_id)
                .bind(role_id)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl EntityStore<User> for MySqlUserRepository {
    type Filter = UserFilter;

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<User>> {
        let Some(mut user) = self.find_row(id).await? else {
            return Ok(None);
        };

        let roles = MySqlRoleRepository::find_by_user(&self.pool, id).await?;
        user.set_roles(roles);

        Ok(Some(user))
    }

    async fn find_all_paged(&self, filter: &UserFilter, page: &PageRequest) -> StoreResult<Page<User>> {
        let email = filter.email.as_deref().map(str::trim).filter(|e| !e.is_empty());

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tb_user \
             WHERE (? IS NULL OR LOWER(email) LIKE CONCAT('%', LOWER(?), '%'))",
        )
        .bind(email)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM tb_user \
             WHERE (? IS NULL OR LOWER(email) LIKE CONCAT('%', LOWER(?), '%')) {} LIMIT ? OFFSET ?",
            page.order_by("first_name")
        );
        let mut users = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .bind(email)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        self.load_roles(&mut users).await?;

        Ok(Page::new(users, page, total.max(0) as u64))
    }

    async fn save(&self, entity: User) -> StoreResult<User> {
        let mut tx = self.pool.begin().await?;

        let id = match entity.id {
            None => {
                let result = sqlx::query(
                    "INSERT INTO tb_user (first_name, last_name, email, password) VALUES (?, ?, ?, ?)",
                )
                .bind(&entity.first_name)
                .bind(&entity.last_name)
                .bind(&entity.email)
                .bind(&entity.password)
                .execute(&mut *tx)
                .await?;

                result.last_insert_id() as DbId
            }
            Some(id) => {
                let locked: Option<DbId> =
                    sqlx::query_scalar("SELECT id FROM tb_user WHERE id = ? FOR UPDATE")
                        .bind(id)
                        .fetch_optional(&mut *tx)
                        .await?;
                if locked.is_none() {
                    return Err(StoreError::RowAbsent { entity: ENTITY, id });
                }

                sqlx::query(
                    "UPDATE tb_user SET first_name = ?, last_name = ?, email = ?, password = ? WHERE id = ?",
                )
                .bind(&entity.first_name)
                .bind(&entity.last_name)
                .bind(&entity.email)
                .bind(&entity.password)
                .bind(id)
                .execute(&mut *tx)
                .await?;

                id
            }
        };

        Self::write_roles(&mut tx, id, &entity.roles).await?;
        tx.commit().await?;

        Ok(User {
            id: Some(id),
            ..entity
        })
    }

    async fn delete_by_id(&self, id: DbId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM tb_user WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RowAbsent { entity: ENTITY, id });
        }
        Ok(())
    }

    async fn get_reference(&self, id: DbId) -> StoreResult<User> {
        self.find_row(id)
            .await?
            .ok_or(StoreError::RowAbsent { entity: ENTITY, id })
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {COLUMNS} FROM tb_user WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
