pub mod auth;
pub mod common;
pub mod permission;
pub mod role;
pub mod user;
