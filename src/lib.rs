//! Knowledge Engine - a learning assistant backed by a tool-calling agent
//!
//! Knowledge Engine serves a chat API. Each message goes to an LLM agent
//! that can call a fixed set of tools: Wikipedia and dictionary lookups,
//! translation, a personal knowledge base, a calculator, a summarizer and
//! generators for flashcards, mind maps, idea expansions and learning
//! roadmaps. Generated artifacts are kept in JSON documents on disk.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      HTTP (axum)                          │
//! │   /api/chat   /api/clear   /api/stats   /health   /*      │
//! └──────┬──────────────┬───────────┬────────────────────────┘
//!        │              │           │
//! ┌──────▼──────┐ ┌─────▼───────┐   │
//! │   Agent     │ │ SessionStore│   │
//! │ (LLM loop)  │ │ (history)   │   │
//! └──────┬──────┘ └─────────────┘   │
//!        │ tool calls               │
//! ┌──────▼───────────────────────┐  │
//! │           ToolSet             │  │
//! │ knowledge · generators ·      │  │
//! │ lookups · calculator · ...    │  │
//! └──────┬───────────────────────┘  │
//!        │                          │
//! ┌──────▼──────────────────────────▼┐
//! │    Documents (JSON files)         │
//! └───────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`gateway`]: server lifecycle and chat handlers
//! - [`api`]: the combined HTTP application
//! - [`agent`]: LLM client and tool-calling loop
//! - [`tools`]: tool registry and implementations
//! - [`knowledge`]: the knowledge base
//! - [`documents`]: JSON document store
//! - [`session`]: per-session conversation history
//! - [`config`]: configuration management

pub mod agent;
pub mod api;
pub mod config;
pub mod documents;
pub mod error;
pub mod gateway;
pub mod knowledge;
pub mod session;
pub mod tools;

pub use config::EngineConfig;
pub use error::{Error, Result};
