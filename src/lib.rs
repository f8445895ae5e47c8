//! DSCatalog product catalog service library
//!
//! Products, categories, users and roles exposed over a paginated REST API
//! backed by MySQL.

pub mod app;
pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use app::{configure_api, AppServices};
pub use modules::categories;
pub use modules::products;
pub use modules::roles;
pub use modules::users;
