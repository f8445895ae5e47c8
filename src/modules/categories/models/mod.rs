mod category;

pub use category::{Category, CategoryDto, CategoryFilter};
