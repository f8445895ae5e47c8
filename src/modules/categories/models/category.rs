use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::core::types::DbId;
use crate::core::validation::not_blank;

/// Persisted category row from `tb_category`
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Category {
    /// Assigned by the store on first save
    pub id: Option<DbId>,
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

/// Category transfer object. Also used as the lightweight category
/// reference embedded in product payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CategoryDto {
    #[serde(default)]
    pub id: Option<DbId>,

    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(max = 60, message = "Name must have at most 60 characters")
    )]
    pub name: String,
}

impl CategoryDto {
    /// Mutable-field subset of the entity. The id is left for the service to set.
    pub fn to_entity(&self) -> Category {
        Category {
            id: None,
            name: self.name.clone(),
        }
    }
}

impl From<Category> for CategoryDto {
    fn from(entity: Category) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
        }
    }
}

impl From<&Category> for CategoryDto {
    fn from(entity: &Category) -> Self {
        Self {
            id: entity.id,
            name: entity.name.clone(),
        }
    }
}

/// Query filter for paged category listings (`?name=`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryFilter {
    /// Case-insensitive substring match on the name
    pub name: Option<String>,
}
