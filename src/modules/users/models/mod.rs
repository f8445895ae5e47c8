mod user;

pub use user::{User, UserDto, UserFilter, UserInsertDto};
