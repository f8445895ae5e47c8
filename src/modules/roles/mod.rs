// Roles module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Role, RoleDto, RoleFilter};
pub use repositories::{MySqlRoleRepository, RoleStore};
pub use services::RoleService;
