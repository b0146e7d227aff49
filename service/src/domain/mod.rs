//! Domain definitions.

pub mod agency;
pub mod role;
pub mod signup_code;
pub mod user;

pub use self::{signup_code::SignupCode, user::User};
