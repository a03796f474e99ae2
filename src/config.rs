//! Knowledge Engine configuration management

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Main Knowledge Engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Document storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Model configuration
    #[serde(default)]
    pub models: ModelsConfig,

    /// Agent loop configuration
    #[serde(default)]
    pub agent: AgentConfig,

    /// External lookup endpoints
    #[serde(default)]
    pub lookup: LookupConfig,
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed CORS origins (empty = any)
    pub cors_origins: Vec<String>,

    /// Directory of static frontend files served at `/`
    pub frontend_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            cors_origins: Vec::new(),
            frontend_dir: None,
        }
    }
}

/// Model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Default model provider
    pub default_provider: String,

    /// Model configurations by provider
    pub providers: HashMap<String, ModelProviderConfig>,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        let mut providers = HashMap::new();
        providers.insert(
            "openai".to_string(),
            ModelProviderConfig {
                api_key_ref: "openai_api_key".to_string(),
                base_url: None,
                default_model: "gpt-4o-mini".to_string(),
                temperature: 0.7,
            },
        );

        Self {
            default_provider: "openai".to_string(),
            providers,
        }
    }
}

impl ModelsConfig {
    /// Provider entry selected by `default_provider`
    pub fn default_provider_config(&self) -> Result<&ModelProviderConfig> {
        self.providers.get(&self.default_provider).ok_or_else(|| {
            Error::Config(format!(
                "Default provider '{}' is not configured",
                self.default_provider
            ))
        })
    }
}

/// Model provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelProviderConfig {
    /// Name of the environment variable holding the API key
    pub api_key_ref: String,

    /// Custom base URL (OpenAI-compatible)
    pub base_url: Option<String>,

    /// Default model
    pub default_model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_temperature() -> f32 {
    0.7
}

impl ModelProviderConfig {
    /// Base URL with the OpenAI endpoint as fallback
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or("https://api.openai.com/v1")
    }
}

/// Resolve API keys from environment variables.
///
/// For each provider, the `api_key_ref` field names an environment variable
/// (e.g. `"openai_api_key"` → reads `$OPENAI_API_KEY`).  We try both
/// the original casing and the UPPER_CASE form.
pub fn resolve_api_keys_from_env(models: &ModelsConfig) -> HashMap<String, String> {
    let mut keys = HashMap::new();
    for (provider_name, cfg) in &models.providers {
        let val = std::env::var(&cfg.api_key_ref)
            .or_else(|_| std::env::var(cfg.api_key_ref.to_uppercase()));
        if let Ok(key) = val {
            keys.insert(provider_name.clone(), key);
        }
    }
    keys
}

/// Agent loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Maximum LLM round-trips per chat turn
    pub max_steps: usize,

    /// Messages kept per session after each turn
    pub history_limit: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: 50,
            history_limit: 20,
        }
    }
}

/// External lookup endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Wikipedia page-summary endpoint (topic is appended as a path segment)
    pub wikipedia_url: String,

    /// Dictionary endpoint (word is appended as a path segment)
    pub dictionary_url: String,

    /// Translation endpoint
    pub translate_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            wikipedia_url: "https://en.wikipedia.org/api/rest_v1/page/summary".to_string(),
            dictionary_url: "https://api.dictionaryapi.dev/api/v2/entries/en".to_string(),
            translate_url: "https://libretranslate.de/translate".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding every JSON document
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs_next::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("knowledge-engine"),
        }
    }
}
