//! Agent: an LLM driving the tool set through a bounded tool-calling loop

pub mod client;
pub mod runner;
pub mod types;

pub use client::{LlmClient, OpenAiClient};
pub use runner::{Agent, SYSTEM_PROMPT};
pub use types::{ChatMessage, LlmResponse, Role, ToolCall};
