pub mod role_controller;

pub use role_controller::configure;
