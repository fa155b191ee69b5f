mod guards;
mod json_error;
mod panic;

pub use guards::{
    AdminGuard, AuthRoleGuard, DevGuard, OrgAdminGuard, UserGuard, session_tokens_from_parts,
};
pub use json_error::json_error_middleware;
pub use panic::catch_panic_layer;
