pub mod categories;
pub mod health;
pub mod products;
pub mod roles;
pub mod users;
