pub mod memory;
pub mod store;
pub mod tweets;
pub mod users;
pub mod validation;
