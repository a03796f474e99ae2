//! Conversation sessions

mod store;

pub use store::{SessionStore, TurnGuard};
