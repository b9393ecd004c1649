//! Data models for the alumni mentorship workflow.
//!
//! These mirror the JSON shapes exchanged with the alumni REST API.

mod mentor;
mod mentorship;
mod user;

pub use mentor::*;
pub use mentorship::*;
pub use user::*;
