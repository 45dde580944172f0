//! Validation queue: per-item display and the moderator actions on it.

pub mod action;
pub mod auth;
pub mod hooks;
pub mod lang;
pub mod posting;
pub mod view;

mod error;
mod workflow;

pub use error::QueueError;
pub use workflow::{QueueServices, QueueWorkflow, WorkflowSettings, first_post_text};

/// Current time in unix seconds.
pub(crate) fn now() -> i64 {
    chrono::Utc::now().timestamp()
}
