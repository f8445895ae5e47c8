// Products module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Product, ProductDto, ProductFilter};
pub use repositories::{MySqlProductRepository, ProductStore};
pub use services::ProductService;
