use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::core::types::DbId;
use crate::core::validation::{not_blank, reference_ids, ValidationError};
use crate::modules::roles::models::{Role, RoleDto};

/// Persisted user row from `tb_user` plus granted roles
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: Option<DbId>,
    pub first_name: String,
    pub last_name: String,
    /// Unique across all users
    pub email: String,
    /// Encoded password hash, never the raw password
    pub password: String,

    #[sqlx(skip)]
    pub roles: Vec<Role>,
}

impl User {
    /// Replace the role set, dropping duplicate ids
    pub fn set_roles(&mut self, roles: Vec<Role>) {
        let mut unique: Vec<Role> = Vec::with_capacity(roles.len());
        for role in roles {
            if !unique.iter().any(|r| r.id == role.id) {
                unique.push(role);
            }
        }
        self.roles = unique;
    }
}

/// Read-side user transfer object. Never carries the password.
///
/// Also the payload of `PUT /users/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UserDto {
    #[serde(default)]
    pub id: Option<DbId>,

    #[validate(
        custom(function = "not_blank"),
        length(max = 60, message = "First name must have at most 60 characters")
    )]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(max = 60, message = "Last name must have at most 60 characters"))]
    pub last_name: String,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 120, message = "Email must have at most 120 characters")
    )]
    pub email: String,

    #[serde(default)]
    pub roles: Vec<RoleDto>,
}

/// Write-side payload of `POST /users`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct UserInsertDto {
    #[validate(
        custom(function = "not_blank"),
        length(max = 60, message = "First name must have at most 60 characters")
    )]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(max = 60, message = "Last name must have at most 60 characters"))]
    pub last_name: String,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 120, message = "Email must have at most 120 characters")
    )]
    pub email: String,

    #[serde(default)]
    pub roles: Vec<RoleDto>,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

fn role_ids(roles: &[RoleDto]) -> Result<Vec<DbId>, ValidationError> {
    reference_ids("roles", roles.iter().map(|r| r.id))
}

impl UserDto {
    /// Mutable-field subset. Id, password and roles are set by the service.
    pub fn to_entity(&self) -> User {
        User {
            id: None,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            password: String::new(),
            roles: Vec::new(),
        }
    }

    pub fn role_ids(&self) -> Result<Vec<DbId>, ValidationError> {
        role_ids(&self.roles)
    }
}

impl UserInsertDto {
    /// Mutable-field subset. The raw password is not copied; the service encodes it.
    pub fn to_entity(&self) -> User {
        User {
            id: None,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            password: String::new(),
            roles: Vec::new(),
        }
    }

    pub fn role_ids(&self) -> Result<Vec<DbId>, ValidationError> {
        role_ids(&self.roles)
    }
}

impl From<User> for UserDto {
    fn from(entity: User) -> Self {
        Self {
            id: entity.id,
            first_name: entity.first_name,
            last_name: entity.last_name,
            email: entity.email,
            roles: entity.roles.into_iter().map(RoleDto::from).collect(),
        }
    }
}

/// Query filter for paged user listings (`?email=`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
    /// Case-insensitive substring match on the email
    pub email: Option<String>,
}
