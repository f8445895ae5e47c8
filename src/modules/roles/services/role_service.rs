use std::sync::Arc;

use crate::core::error::{AppError, Result, StoreError};
use crate::core::pagination::{Page, PageRequest};
use crate::core::types::DbId;
use crate::modules::roles::models::{RoleDto, RoleFilter};
use crate::modules::roles::repositories::RoleStore;

const ENTITY: &str = "Role";

/// Service for role administration
pub struct RoleService {
    repository: Arc<RoleStore>,
}

impl RoleService {
    pub fn new(repository: Arc<RoleStore>) -> Self {
        Self { repository }
    }

    pub async fn find_all_paged(&self, filter: &RoleFilter, page: &PageRequest) -> Result<Page<RoleDto>> {
        let roles = self.repository.find_all_paged(filter, page).await?;
        Ok(roles.map(RoleDto::from))
    }

    pub async fn find_by_id(&self, id: DbId) -> Result<RoleDto> {
        let role = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(ENTITY, id))?;

        Ok(RoleDto::from(role))
    }

    pub async fn insert(&self, dto: RoleDto) -> Result<RoleDto> {
        let role = self
            .repository
            .save(dto.to_entity())
            .await
            .map_err(duplicate_authority)?;

        tracing::info!(role_id = ?role.id, authority = %role.authority, "Role created");
        Ok(RoleDto::from(role))
    }

    pub async fn update(&self, id: DbId, dto: RoleDto) -> Result<RoleDto> {
        if self.repository.find_by_id(id).await?.is_none() {
            return Err(AppError::not_found(ENTITY, id));
        }

        let mut role = dto.to_entity();
        role.id = Some(id);
        let role = self.repository.save(role).await.map_err(duplicate_authority)?;

        tracing::info!(role_id = id, "Role updated");
        Ok(RoleDto::from(role))
    }

    pub async fn delete(&self, id: DbId) -> Result<()> {
        self.repository
            .delete_by_id(id)
            .await
            .map_err(|e| AppError::from_delete(e, ENTITY, id))?;

        tracing::info!(role_id = id, "Role deleted");
        Ok(())
    }
}

fn duplicate_authority(err: StoreError) -> AppError {
    match err {
        StoreError::UniqueViolation(_) => AppError::validation("authority", "Authority already exists"),
        other => AppError::from(other),
    }
}
