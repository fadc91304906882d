//! HTTP route handlers.

pub mod confirmation;
pub mod health;

pub use confirmation::{confirm_mobile, confirm_nino};
pub use health::{build_info, health};
