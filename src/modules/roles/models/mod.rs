mod role;

pub use role::{Role, RoleDto, RoleFilter};
