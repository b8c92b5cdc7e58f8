//! Bearer-token authentication: JWT verification, middleware, and the
//! authenticated-caller extractor.

pub mod jwt;
pub mod middleware;
pub mod models;

pub use middleware::{auth_middleware, AuthState};
pub use models::AuthUser;
