//! # Application Configuration
//!
//! This module defines the configuration structure for the `ctfrag-server` and
//! provides the logic for loading it from a `config.yml` file and environment
//! variables. This approach allows for a structured, flexible, and maintainable
//! configuration setup.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use ctfrag::constants::{DEFAULT_CONVERTER, DEFAULT_SESSION_ROOT, DEFAULT_TOP_K, DEFAULT_WANT_N};
use ctfrag::validate::{
    DEFAULT_MEANINGLESS_INPUTS, DEFAULT_MIN_PROMPT_CHARS, DEFAULT_TOPIC_KEYWORDS,
};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use tracing::info;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The timeout applied to every outbound HTTP request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Session directory placement and retention.
    #[serde(default)]
    pub session: SessionConfig,
    /// The writeup generation provider. Without one the server starts, but
    /// every generation request is rejected.
    #[serde(default)]
    pub generation: Option<GenerationConfig>,
    /// The reference example backend. Without one writeups are generated
    /// from the prompt alone.
    #[serde(default)]
    pub retrieval: Option<RetrievalConfig>,
    /// Prompt validation thresholds and word lists.
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Provides a default value for the `port` field if not set in the environment.
fn default_port() -> u16 {
    9090
}

fn default_request_timeout_secs() -> u64 {
    120
}

/// Where session directories live and how long they are kept.
#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    #[serde(default = "default_session_root")]
    pub root: String,
    /// The markdown-to-docx converter binary, resolved through `PATH`.
    #[serde(default = "default_converter")]
    pub converter: String,
    /// Sessions older than this are deleted on startup.
    #[serde(default = "default_max_age_hours")]
    pub max_age_hours: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            root: default_session_root(),
            converter: default_converter(),
            max_age_hours: default_max_age_hours(),
        }
    }
}

fn default_session_root() -> String {
    DEFAULT_SESSION_ROOT.to_string()
}

fn default_converter() -> String {
    DEFAULT_CONVERTER.to_string()
}

fn default_max_age_hours() -> u64 {
    24
}

/// The configuration for the writeup generation provider.
#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    /// The type of provider (e.g., "gemini", "local").
    pub provider: String,
    /// The API URL. Optional for providers like Gemini where it can be derived.
    pub api_url: Option<String>,
    /// The API key, which can be null for local providers.
    pub api_key: Option<String>,
    pub model_name: String,
}

/// The configuration for the retrieval backend.
#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    pub embedding: EmbeddingConfig,
    pub vector: VectorConfig,
    /// How many candidates to pull from the vector store per query.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// How many ranked examples end up in the composed prompt.
    #[serde(default = "default_want_n")]
    pub want_n: usize,
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_want_n() -> usize {
    DEFAULT_WANT_N
}

/// Configuration for the embedding model provider.
#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    pub api_url: String,
    pub model_name: String,
    pub api_key: Option<String>,
}

/// Configuration for the vector store.
#[derive(Debug, Deserialize, Clone)]
pub struct VectorConfig {
    pub api_url: String,
    pub api_key: Option<String>,
}

/// The tunable parts of prompt validation.
#[derive(Debug, Deserialize, Clone)]
pub struct ValidationConfig {
    #[serde(default = "default_min_prompt_chars")]
    pub min_prompt_chars: usize,
    #[serde(default = "default_meaningless_inputs")]
    pub meaningless_inputs: Vec<String>,
    #[serde(default = "default_topic_keywords")]
    pub topic_keywords: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_prompt_chars: default_min_prompt_chars(),
            meaningless_inputs: default_meaningless_inputs(),
            topic_keywords: default_topic_keywords(),
        }
    }
}

fn default_min_prompt_chars() -> usize {
    DEFAULT_MIN_PROMPT_CHARS
}

fn default_meaningless_inputs() -> Vec<String> {
    DEFAULT_MEANINGLESS_INPUTS
        .iter()
        .map(|w| w.to_string())
        .collect()
}

fn default_topic_keywords() -> Vec<String> {
    DEFAULT_TOPIC_KEYWORDS.iter().map(|w| w.to_string()).collect()
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}").unwrap();
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_else(|_| "".to_string())
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration from a file and environment variables.
///
/// This function reads the configuration from a file. It also merges in environment
/// variables, allowing for overrides and substitution in the YAML file.
/// - Top-level keys like `port` are overridden by `PORT`.
/// - Nested keys are overridden by `CTFRAG_...` variables (e.g., `CTFRAG_SESSION__ROOT`).
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let base_path = env!("CARGO_MANIFEST_DIR");
    let mut builder = ConfigBuilder::builder();

    // Layer 1: Main Config (with Fallback)
    let main_config_path = if let Some(override_path) = config_path_override {
        override_path.to_string()
    } else {
        let user_config_path = format!("{base_path}/config.yml");
        if std::path::Path::new(&user_config_path).exists() {
            info!("Loading user-defined configuration from '{user_config_path}'.");
            user_config_path
        } else {
            let provider = env::var("AI_PROVIDER").unwrap_or_else(|_| "local".to_string());
            let fallback_path = format!("{base_path}/config.{provider}.yml");
            info!("'{user_config_path}' not found. Falling back to '{fallback_path}' based on AI_PROVIDER='{provider}'.");
            fallback_path
        }
    };

    let main_content = read_and_substitute(&main_config_path)?
        .ok_or_else(|| ConfigError::NotFound(format!("Main config file not found at '{main_config_path}'. Please ensure 'config.yml' exists or your AI_PROVIDER is set to load a valid template ('local' or 'gemini').")))?;
    builder = builder.add_source(File::from_str(&main_content, FileFormat::Yaml));

    let settings = builder
        // Layer 2: Load environment variables for top-level keys like PORT.
        .add_source(Environment::default())
        // Layer 3: Load prefixed environment variables for deeper overrides.
        .add_source(
            Environment::with_prefix("CTFRAG")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    // Deserialize the fully resolved configuration into our `AppConfig` struct.
    let mut config: AppConfig = settings.try_deserialize()?;

    // `${VAR}` substitution leaves an empty string behind when the variable is
    // unset. Normalize those to `None` so a missing key or URL is caught at
    // startup instead of surfacing as a failed request later.
    if let Some(generation) = config.generation.as_mut() {
        generation.api_key = generation.api_key.take().filter(|k| !k.is_empty());
        generation.api_url = generation.api_url.take().filter(|u| !u.is_empty());
    }
    if let Some(retrieval) = config.retrieval.as_mut() {
        retrieval.embedding.api_key = retrieval.embedding.api_key.take().filter(|k| !k.is_empty());
        retrieval.vector.api_key = retrieval.vector.api_key.take().filter(|k| !k.is_empty());
    }

    Ok(config)
}
