pub mod bootstrap;
pub mod confirmation;
pub mod password;
pub mod session;
mod types;

pub use confirmation::ConfirmationPurpose;
pub use types::{AdminRole, DevRole, OrgAdminRole, ROLE_HIERARCHY, RequiredRole, Role, UserRole};
