pub mod category_repository;

pub use category_repository::{CategoryStore, MySqlCategoryRepository, CATEGORY_SORTABLE};
