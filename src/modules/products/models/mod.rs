mod product;

pub use product::{Product, ProductDto, ProductFilter};
