//! Configuration loading, validation, and management for agentwire.
//!
//! Loads configuration from `~/.agentwire/config.toml` with environment
//! variable overrides. Validates all settings at startup. Credentials are
//! only ever taken from this file or the environment.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.agentwire/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the completion API (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default LLM provider
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Default sampling temperature
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Max tokens per LLM response (unset = provider default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Timeout for a single completion request
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Which model serves which role
    #[serde(default)]
    pub models: ModelsConfig,

    /// Revision loop settings
    #[serde(default)]
    pub revision: RevisionConfig,

    /// Mail transport settings
    #[serde(default)]
    pub mail: MailConfig,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_request_timeout() -> u64 {
    120
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_provider", &self.default_provider)
            .field("default_temperature", &self.default_temperature)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("models", &self.models)
            .field("revision", &self.revision)
            .field("mail", &self.mail)
            .field("providers", &self.providers)
            .finish()
    }
}

/// Model assignment per pipeline role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Routing, inspection, and general chat
    #[serde(default = "default_router_model")]
    pub router: String,

    /// Breakfast and lunch chefs, master and creative chefs
    #[serde(default = "default_chef_model")]
    pub chef: String,

    /// Dinner chef
    #[serde(default = "default_dinner_model")]
    pub dinner: String,

    /// Plain chat and the email assistant
    #[serde(default = "default_router_model")]
    pub chat: String,
}

fn default_router_model() -> String {
    "gpt-5-nano".into()
}
fn default_chef_model() -> String {
    "gpt-5-mini".into()
}
fn default_dinner_model() -> String {
    "gpt-4.1-mini".into()
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            router: default_router_model(),
            chef: default_chef_model(),
            dinner: default_dinner_model(),
            chat: default_router_model(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevisionConfig {
    /// Maximum specialist invocations per turn before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_max_attempts() -> u32 {
    3
}

impl Default for RevisionConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    /// STARTTLS submission port
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default = "default_imap_host")]
    pub imap_host: String,

    /// Implicit-TLS IMAP port
    #[serde(default = "default_imap_port")]
    pub imap_port: u16,

    /// Sender address used by the email assistant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,

    /// Account (app) password for SMTP and IMAP login
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Timeout for each SMTP/IMAP operation
    #[serde(default = "default_mail_timeout")]
    pub timeout_secs: u64,
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".into()
}
fn default_smtp_port() -> u16 {
    587
}
fn default_imap_host() -> String {
    "imap.gmail.com".into()
}
fn default_imap_port() -> u16 {
    993
}
fn default_mail_timeout() -> u64 {
    30
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            imap_host: default_imap_host(),
            imap_port: default_imap_port(),
            sender: None,
            password: None,
            timeout_secs: default_mail_timeout(),
        }
    }
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("imap_host", &self.imap_host)
            .field("imap_port", &self.imap_port)
            .field("sender", &self.sender)
            .field("password", &redact(&self.password))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.agentwire/config.toml).
    ///
    /// Environment variables are applied on top; see [`AppConfig::apply_env`].
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env(&Self::config_dir().join("config.toml"))
    }

    /// Load configuration from `path`, then apply process environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_env(|key| std::env::var(key).ok().filter(|v| !v.is_empty()));
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables.
    ///
    /// - `AGENTWIRE_API_KEY`, then `OPENAI_API_KEY` (only if no key is configured)
    /// - `AGENTWIRE_PROVIDER`, `AGENTWIRE_BASE_URL`
    /// - `GMAIL_PASSWORD`, `GMAIL_SENDER`, then `GMAIL_USERNAME`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.api_key.is_none() {
            self.api_key = lookup("AGENTWIRE_API_KEY").or_else(|| lookup("OPENAI_API_KEY"));
        }

        if let Some(provider) = lookup("AGENTWIRE_PROVIDER") {
            self.default_provider = provider;
        }

        if let Some(url) = lookup("AGENTWIRE_BASE_URL") {
            self.providers
                .entry(self.default_provider.clone())
                .or_default()
                .api_url = Some(url);
        }

        if let Some(password) = lookup("GMAIL_PASSWORD") {
            self.mail.password = Some(password);
        }

        if self.mail.sender.is_none() {
            self.mail.sender = lookup("GMAIL_SENDER").or_else(|| lookup("GMAIL_USERNAME"));
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".agentwire")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.default_temperature) {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.revision.max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "revision.max_attempts must be at least 1".into(),
            ));
        }

        if self.request_timeout_secs == 0 || self.mail.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeouts must be greater than zero".into(),
            ));
        }

        if self.mail.smtp_port == 0 || self.mail.imap_port == 0 {
            return Err(ConfigError::ValidationError(
                "mail ports must be non-zero".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_temperature: default_temperature(),
            max_tokens: None,
            request_timeout_secs: default_request_timeout(),
            models: ModelsConfig::default(),
            revision: RevisionConfig::default(),
            mail: MailConfig::default(),
            providers: HashMap::new(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
