//! Authentication and authorization

pub mod password;
pub mod user_auth;

pub use user_auth::{UserIdentity, require_admin, user_auth_middleware};
