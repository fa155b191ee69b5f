pub mod admins;
pub mod catalog;
pub mod public;
pub mod quiz;
mod router;
pub mod users;

pub use router::router;
