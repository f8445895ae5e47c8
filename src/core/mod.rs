pub mod error;
pub mod pagination;
pub mod security;
pub mod traits;
pub mod types;
pub mod validation;

pub use error::{AppError, Result, StoreError, StoreResult};
pub use pagination::{Direction, Page, PageLimits, PageParams, PageRequest};
pub use security::{Argon2PasswordEncoder, PasswordEncoder};
pub use traits::EntityStore;
pub use types::{resource_location, DbId};
pub use validation::{FieldMessage, ValidationError};
