//! Gateway server implementation

use super::handler::ChatState;
use crate::agent::{Agent, LlmClient, OpenAiClient};
use crate::config::EngineConfig;
use crate::documents::{DocumentStats, Documents};
use crate::error::{Error, Result};
use crate::session::SessionStore;
use crate::tools::ToolSet;
use axum::Router;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Knowledge Engine gateway: owns the stores and agent, serves HTTP
pub struct Gateway {
    config: EngineConfig,
    documents: Arc<Documents>,
    sessions: SessionStore,
    agent: Arc<Agent>,
}

impl Gateway {
    /// Create a gateway that talks to `llm`
    pub fn new(config: EngineConfig, llm: Arc<dyn LlmClient>) -> Result<Self> {
        let documents = Arc::new(Documents::new(config.storage.data_dir.clone()));
        let tools = ToolSet::new(documents.clone(), &config.lookup)?;
        let agent = Arc::new(Agent::new(llm, tools, config.agent.max_steps));

        Ok(Self {
            config,
            documents,
            sessions: SessionStore::new(),
            agent,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn documents(&self) -> &Arc<Documents> {
        &self.documents
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Record counts across the documents
    pub async fn stats(&self) -> Result<DocumentStats> {
        self.documents.stats().await
    }

    /// State shared by the chat handlers
    pub fn chat_state(&self) -> ChatState {
        ChatState {
            agent: self.agent.clone(),
            sessions: self.sessions.clone(),
            documents: self.documents.clone(),
            history_limit: self.config.agent.history_limit,
        }
    }

    /// The complete HTTP application
    pub fn router(&self) -> Router {
        crate::api::build_app(self.chat_state(), &self.config.server)
    }

    /// Bind the configured address and serve until Ctrl+C
    pub async fn serve(&self) -> Result<()> {
        let addr = format!("{}:{}", self.config.server.host, self.config.server.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::Gateway(format!("Failed to bind {}: {}", addr, e)))?;

        self.serve_on(listener, shutdown_signal()).await
    }

    /// Serve on `listener` until `shutdown` resolves
    pub async fn serve_on<F>(&self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local = listener.local_addr()?;
        tracing::info!(
            "Knowledge Engine listening on http://{} (data dir {})",
            local,
            self.documents.data_dir().display()
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Knowledge Engine stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}

/// Builder for creating a gateway
pub struct GatewayBuilder {
    config: EngineConfig,
    llm: Option<Arc<dyn LlmClient>>,
}

impl GatewayBuilder {
    /// Create a new builder with default config
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            llm: None,
        }
    }

    /// Set the configuration
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the listen host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.server.host = host.into();
        self
    }

    /// Set the listen port
    pub fn port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    /// Set the directory holding the JSON documents
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.storage.data_dir = dir.into();
        self
    }

    /// Use `llm` instead of the configured provider
    pub fn llm_client(mut self, llm: Arc<dyn LlmClient>) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Build the gateway
    pub fn build(self) -> Result<Gateway> {
        let llm = match self.llm {
            Some(llm) => llm,
            None => Arc::new(OpenAiClient::from_config(&self.config.models)?),
        };
        Gateway::new(self.config, llm)
    }
}

impl Default for GatewayBuilder {
    fn default() -> Self {
        Self::new()
    }
}
