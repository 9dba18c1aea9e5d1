//! Configuration for the quotation agent
//!
//! Values are resolved in this order, later sources overriding earlier ones:
//! 1. Built-in defaults
//! 2. TOML file (`arabiers.toml`, or the path in `ARABIERS_CONFIG`)
//! 3. `.env` file in the working directory
//! 4. Process environment variables

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "arabiers.toml";

/// Main agent configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AgentConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Azure OpenAI configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Azure AI Search configuration
    #[serde(default)]
    pub search: SearchConfig,
    /// Persona and agent-loop configuration
    #[serde(default)]
    pub agent: AgentSettings,
    /// PDF export configuration
    #[serde(default)]
    pub export: ExportConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Idle time after which a UI session is dropped, in seconds
    pub session_ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8501,
            enable_cors: true,
            session_ttl_secs: 3600,
        }
    }
}

/// Azure OpenAI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`
    pub endpoint: String,
    /// Deployment name
    pub deployment: String,
    /// REST API version
    pub api_version: String,
    /// API key
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum output tokens
    pub max_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Whether the deployment exposes the chat-completions entry point
    pub chat_completions: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            deployment: String::new(),
            api_version: "2024-06-01".to_string(),
            api_key: String::new(),
            temperature: 0.2,
            max_tokens: 800,
            timeout_secs: 120,
            chat_completions: true,
        }
    }
}

/// Azure AI Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search service name (`{service}.search.windows.net`)
    pub service_name: String,
    /// Index name
    pub index_name: String,
    /// Query API key
    #[serde(skip_serializing)]
    pub api_key: String,
    /// REST API version
    pub api_version: String,
    /// Field holding the passage text
    pub content_key: String,
    /// Number of passages used per question
    pub top_k: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            service_name: String::new(),
            index_name: String::new(),
            api_key: String::new(),
            api_version: "2024-05-01-preview".to_string(),
            content_key: "content".to_string(),
            top_k: 4,
            timeout_secs: 30,
        }
    }
}

/// How the agent answers a question
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AgentMode {
    /// Retrieve once, then a single grounded generation call
    #[default]
    Direct,
    /// ReAct loop with the document search exposed as a tool
    Agent,
}

impl FromStr for AgentMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "direct" => Ok(AgentMode::Direct),
            "agent" | "react" => Ok(AgentMode::Agent),
            other => Err(Error::Config(format!("Unknown agent mode: {}", other))),
        }
    }
}

impl std::fmt::Display for AgentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentMode::Direct => write!(f, "direct"),
            AgentMode::Agent => write!(f, "agent"),
        }
    }
}

/// Persona and agent-loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Name used in the persona and in user-facing error messages
    pub name: String,
    /// Answering mode
    pub mode: AgentMode,
    /// Iteration ceiling for the ReAct loop
    pub max_iterations: u32,
    /// Wall-clock ceiling for the ReAct loop in seconds
    pub max_execution_secs: u64,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            name: "Arabiers AI Agent".to_string(),
            mode: AgentMode::Direct,
            max_iterations: 30,
            max_execution_secs: 120,
        }
    }
}

/// PDF export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Fixed path the latest quotation PDF is written to
    pub pdf_path: PathBuf,
    /// Characters per PDF page chunk
    pub max_chars: usize,
    /// Write every answer to `pdf_path` after generation
    pub auto_export: bool,
    /// Logo shown in the UI header
    pub logo_path: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            pdf_path: PathBuf::from("quote.pdf"),
            max_chars: 3000,
            auto_export: true,
            logo_path: PathBuf::from("assets").join("arabiers.png"),
        }
    }
}

impl AgentConfig {
    /// Load configuration from file, `.env` and environment
    pub fn load() -> Result<Self> {
        let path = std::env::var("ARABIERS_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from(&path)
    }

    /// Load configuration using an explicit config file path.
    ///
    /// A missing file is not an error; defaults are used instead.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            tracing::info!("Loading configuration from {}", path.display());
            Self::from_toml_file(path)?
        } else {
            tracing::info!("No config file at {}, using defaults", path.display());
            Self::default()
        };

        Self::load_dotenv();
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse TOML config text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config file: {}", e)))
    }

    fn load_dotenv() {
        if Path::new(".env").exists() {
            match dotenv::from_filename(".env") {
                Ok(_) => tracing::info!("Loaded .env file from current directory"),
                Err(e) => tracing::warn!("Failed to load .env file: {}", e),
            }
        }
    }

    /// Apply environment overrides using `lookup` to read variables.
    ///
    /// Values that fail to parse are logged and ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Azure OpenAI
        if let Some(v) = lookup("AZURE_OPENAI_ENDPOINT") {
            self.llm.endpoint = v;
        }
        if let Some(v) = lookup("AZURE_OPENAI_DEPLOYMENT") {
            self.llm.deployment = v;
        }
        if let Some(v) = lookup("AZURE_OPENAI_API_VERSION") {
            self.llm.api_version = v;
        }
        if let Some(v) = lookup("AZURE_OPENAI_API_KEY") {
            self.llm.api_key = v;
        }
        parse_into(&lookup, "LLM_TEMPERATURE", &mut self.llm.temperature);
        parse_into(&lookup, "LLM_MAX_TOKENS", &mut self.llm.max_tokens);
        parse_into(&lookup, "LLM_TIMEOUT_SECS", &mut self.llm.timeout_secs);
        parse_bool_into(&lookup, "AZURE_OPENAI_CHAT_COMPLETIONS", &mut self.llm.chat_completions);

        // Azure AI Search
        if let Some(v) = lookup("AZURE_SEARCH_SERVICE_NAME") {
            self.search.service_name = v;
        }
        if let Some(v) = lookup("AZURE_SEARCH_INDEX_NAME") {
            self.search.index_name = v;
        }
        if let Some(v) = lookup("AZURE_SEARCH_KEY") {
            self.search.api_key = v;
        }
        if let Some(v) = lookup("AZURE_SEARCH_API_VERSION") {
            self.search.api_version = v;
        }
        if let Some(v) = lookup("AZURE_SEARCH_CONTENT_KEY") {
            self.search.content_key = v;
        }
        parse_into(&lookup, "RETRIEVER_TOP_K", &mut self.search.top_k);

        // Agent
        if let Some(v) = lookup("AGENT_NAME") {
            self.agent.name = v;
        }
        parse_into(&lookup, "AGENT_MODE", &mut self.agent.mode);
        parse_into(&lookup, "AGENT_MAX_ITERATIONS", &mut self.agent.max_iterations);
        parse_into(&lookup, "AGENT_MAX_EXECUTION_SECS", &mut self.agent.max_execution_secs);

        // Server
        if let Some(v) = lookup("SERVER_HOST") {
            self.server.host = v;
        }
        parse_into(&lookup, "SERVER_PORT", &mut self.server.port);
        parse_into(&lookup, "SESSION_TTL_SECS", &mut self.server.session_ttl_secs);

        // Export
        if let Some(v) = lookup("QUOTE_PDF_PATH") {
            self.export.pdf_path = PathBuf::from(v);
        }
        parse_into(&lookup, "QUOTE_PDF_MAX_CHARS", &mut self.export.max_chars);
        parse_bool_into(&lookup, "QUOTE_PDF_AUTO_EXPORT", &mut self.export.auto_export);
        if let Some(v) = lookup("LOGO_PATH") {
            self.export.logo_path = PathBuf::from(v);
        }
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.search.top_k == 0 {
            return Err(Error::Config("RETRIEVER_TOP_K must be at least 1".to_string()));
        }
        if self.agent.max_iterations == 0 {
            return Err(Error::Config("AGENT_MAX_ITERATIONS must be at least 1".to_string()));
        }
        if self.agent.max_execution_secs == 0 {
            return Err(Error::Config("AGENT_MAX_EXECUTION_SECS must be at least 1".to_string()));
        }
        if self.server.session_ttl_secs == 0 {
            return Err(Error::Config("SESSION_TTL_SECS must be at least 1".to_string()));
        }
        if self.export.max_chars == 0 {
            return Err(Error::Config("QUOTE_PDF_MAX_CHARS must be at least 1".to_string()));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(Error::Config(format!(
                "LLM_TEMPERATURE must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }
        if self.agent.name.trim().is_empty() {
            return Err(Error::Config("AGENT_NAME must not be empty".to_string()));
        }
        Ok(())
    }
}

fn parse_into<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(raw) = lookup(key) {
        match raw.trim().parse::<T>() {
            Ok(value) => *target = value,
            Err(_) => tracing::warn!("Ignoring invalid value for {}: {:?}", key, raw),
        }
    }
}

fn parse_bool_into<F>(lookup: &F, key: &str, target: &mut bool)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(key) {
        match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => *target = true,
            "0" | "false" | "no" | "off" => *target = false,
            _ => tracing::warn!("Ignoring invalid value for {}: {:?}", key, raw),
        }
    }
}
