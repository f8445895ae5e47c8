use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::core::types::DbId;
use crate::core::validation::not_blank;

/// Persisted role row from `tb_role`
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Role {
    pub id: Option<DbId>,
    /// Unique authority name, e.g. `ROLE_ADMIN`
    pub authority: String,
}

/// Role transfer object, also embedded in user payloads as a reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct RoleDto {
    #[serde(default)]
    pub id: Option<DbId>,

    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(max = 60, message = "Authority must have at most 60 characters")
    )]
    pub authority: String,
}

impl RoleDto {
    pub fn to_entity(&self) -> Role {
        Role {
            id: None,
            authority: self.authority.clone(),
        }
    }
}

impl From<Role> for RoleDto {
    fn from(entity: Role) -> Self {
        Self {
            id: entity.id,
            authority: entity.authority,
        }
    }
}

/// Query filter for paged role listings (`?authority=`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleFilter {
    pub authority: Option<String>,
}
