//! Tenant aggregate and its users.

mod aggregate;
mod user;

pub use aggregate::Tenant;
pub use user::User;
