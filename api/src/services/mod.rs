pub mod cookies;
pub mod db;
pub mod error;
pub mod session;
pub mod tweets;
