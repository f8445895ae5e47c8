pub mod role_repository;

pub use role_repository::{MySqlRoleRepository, RoleStore, ROLE_SORTABLE};
