// gate-server/src/middleware/mod.rs
pub mod admin_auth;
pub mod cors;
pub mod session_auth;

pub use admin_auth::{AdminAuth, AdminCredential};
pub use cors::CorsHeaders;
pub use session_auth::SessionAuth;
