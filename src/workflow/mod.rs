//! Mentorship workflow: lifecycle rules, the coordinator and the profile editor.

mod coordinator;
mod editor;
pub mod state;

pub use coordinator::*;
pub use editor::*;
pub use state::{allowed_transitions, next_status, Transition};
