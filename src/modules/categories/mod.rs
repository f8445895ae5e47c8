// Categories module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Category, CategoryDto, CategoryFilter};
pub use repositories::{CategoryStore, MySqlCategoryRepository};
pub use services::CategoryService;
