//! Diet Log tools module
//!
//! One function per user action, operating on a borrowed [`Session`].

pub mod actions;
pub mod days;
pub mod exercises;
pub mod foods;
mod session;
pub mod status;
mod validate;

pub use actions::Action;
pub use days::DaySummary;
pub use session::Session;
