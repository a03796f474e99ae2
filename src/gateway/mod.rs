//! Gateway for Knowledge Engine
//!
//! Wires the document stores, session store and agent together and serves
//! the chat API over HTTP.

mod handler;
mod server;

pub use handler::{chat_router, ChatState, DEFAULT_SESSION};
pub use server::{Gateway, GatewayBuilder};
