pub mod repository;

pub use repository::EntityStore;
