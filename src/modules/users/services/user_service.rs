use std::sync::Arc;

use crate::core::error::{AppError, Result, StoreError};
use crate::core::pagination::{Page, PageRequest};
use crate::core::security::PasswordEncoder;
use crate::core::types::DbId;
use crate::modules::roles::models::Role;
use crate::modules::roles::repositories::RoleStore;
use crate::modules::users::models::{User, UserDto, UserFilter, UserInsertDto};
use crate::modules::users::repositories::UserRepository;

const ENTITY: &str = "User";

const EMAIL_TAKEN: &str = "Email already registered";

/// Service for user business logic
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    role_repository: Arc<RoleStore>,
    password_encoder: Arc<dyn PasswordEncoder>,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        role_repository: Arc<RoleStore>,
        password_encoder: Arc<dyn PasswordEncoder>,
    ) -> Self {
        Self {
            repository,
            role_repository,
            password_encoder,
        }
    }

    pub async fn find_all_paged(&self, filter: &UserFilter, page: &PageRequest) -> Result<Page<UserDto>> {
        let users = self.repository.find_all_paged(filter, page).await?;
        Ok(users.map(UserDto::from))
    }

    pub async fn find_by_id(&self, id: DbId) -> Result<UserDto> {
        let user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(ENTITY, id))?;

        Ok(UserDto::from(user))
    }

    /// Register a user. The email must not belong to anyone yet.
    pub async fn insert(&self, dto: UserInsertDto) -> Result<UserDto> {
        if self.repository.find_by_email(&dto.email).await?.is_some() {
            return Err(AppError::validation("email", EMAIL_TAKEN));
        }

        let mut user = dto.to_entity();
        user.password = self.password_encoder.encode(&dto.password)?;
        user.set_roles(self.resolve_roles(&dto.role_ids()?).await?);

        let user = self.repository.save(user).await.map_err(save_error)?;

        tracing::info!(user_id = ?user.id, "User created");
        Ok(UserDto::from(user))
    }

    /// Overwrite profile fields and roles of an existing user, keeping the stored password.
    pub async fn update(&self, id: DbId, dto: UserDto) -> Result<UserDto> {
        let existing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(ENTITY, id))?;

        if let Some(owner) = self.repository.find_by_email(&dto.email).await? {
            if owner.id != Some(id) {
                return Err(AppError::validation("email", EMAIL_TAKEN));
            }
        }

        let mut user = dto.to_entity();
        user.id = Some(id);
        user.password = existing.password;
        user.set_roles(self.resolve_roles(&dto.role_ids()?).await?);

        let user = self.repository.save(user).await.map_err(save_error)?;

        tracing::info!(user_id = id, "User updated");
        Ok(UserDto::from(user))
    }

    pub async fn delete(&self, id: DbId) -> Result<()> {
        self.repository
            .delete_by_id(id)
            .await
            .map_err(|e| AppError::from_delete(e, ENTITY, id))?;

        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }

    async fn resolve_roles(&self, ids: &[DbId]) -> Result<Vec<Role>> {
        let mut roles = Vec::with_capacity(ids.len());
        for id in ids {
            let role = self
                .role_repository
                .get_reference(*id)
                .await
                .map_err(AppError::from_reference)?;
            roles.push(role);
        }
        Ok(roles)
    }
}

/// A concurrent registration can still hit the unique index, and a role
/// deleted after resolution fails the link insert
fn save_error(err: StoreError) -> AppError {
    match err {
        StoreError::UniqueViolation(_) => AppError::validation("email", EMAIL_TAKEN),
        other => AppError::from_save(other, "Role"),
    }
}
