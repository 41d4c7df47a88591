pub mod auth;

pub use auth::{propagate_auth, require_auth};
