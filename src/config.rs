//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::markdown::DEFAULT_THEME;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub router: RouterConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Chat API connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Origin of the chat API; empty means same-origin (browser only)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    /// Same-origin configuration used by the browser build
    pub fn same_origin() -> Self {
        Self {
            base_url: String::new(),
            ..Self::default()
        }
    }

    /// Join an API path onto the base URL
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// What the guard does when the login or root page is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticatedEntryPolicy {
    /// Always clear the session and show the login page
    #[default]
    ClearSession,
    /// Send signed-in users to their landing page instead
    RedirectToLanding,
}

/// Navigation paths and guard policy
#[derive(Debug, Clone, Deserialize)]
pub struct RouterConfig {
    #[serde(default = "default_login_path")]
    pub login_path: String,

    #[serde(default = "default_root_path")]
    pub root_path: String,

    /// Where signed-in non-admin users land
    #[serde(default = "default_landing")]
    pub default_landing: String,

    /// Where signed-in admins land
    #[serde(default = "default_admin_landing")]
    pub admin_landing: String,

    #[serde(default)]
    pub authenticated_entry: AuthenticatedEntryPolicy,
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_root_path() -> String {
    "/".to_string()
}

fn default_landing() -> String {
    "/chat".to_string()
}

fn default_admin_landing() -> String {
    "/admin".to_string()
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            login_path: default_login_path(),
            root_path: default_root_path(),
            default_landing: default_landing(),
            admin_landing: default_admin_landing(),
            authenticated_entry: AuthenticatedEntryPolicy::default(),
        }
    }
}

/// Markdown rendering options
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Language assumed for code blocks that carry none
    #[serde(default)]
    pub fallback_language: Option<String>,

    /// Highlight theme for the generated stylesheet
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Render single line breaks as `<br />`
    #[serde(default = "default_true")]
    pub breaks: bool,

    /// Tables, strikethrough and task lists
    #[serde(default = "default_true")]
    pub gfm: bool,
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fallback_language: None,
            theme: default_theme(),
            breaks: true,
            gfm: true,
        }
    }
}

/// Where the CLI keeps its durable session
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_file")]
    pub file: String,
}

fn default_session_file() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("chatdesk").join("session.json").to_string_lossy().to_string())
        .unwrap_or_else(|| "./chatdesk_session.json".to_string())
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            file: default_session_file(),
        }
    }
}

impl SessionConfig {
    /// Session file path with a leading `~/` expanded
    pub fn path(&self) -> PathBuf {
        match (self.file.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(&self.file),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("chatdesk").join("config.toml")),
            Some(PathBuf::from("/etc/chatdesk/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // API overrides
        if let Ok(url) = std::env::var("CHATDESK_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(timeout) = std::env::var("CHATDESK_REQUEST_TIMEOUT") {
            if let Ok(secs) = timeout.parse() {
                self.api.request_timeout_secs = secs;
            }
        }

        // Session overrides
        if let Ok(file) = std::env::var("CHATDESK_SESSION_FILE") {
            self.session.file = file;
        }

        // Render overrides
        if let Ok(language) = std::env::var("CHATDESK_FALLBACK_LANGUAGE") {
            self.render.fallback_language = Some(language).filter(|l| !l.is_empty());
        }

        // Logging overrides
        if let Ok(level) = std::env::var("CHATDESK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("CHATDESK_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Chat Desk Configuration
#
# Environment variables override these settings:
# - CHATDESK_API_URL
# - CHATDESK_REQUEST_TIMEOUT
# - CHATDESK_SESSION_FILE
# - CHATDESK_FALLBACK_LANGUAGE
# - CHATDESK_LOG_LEVEL
# - CHATDESK_LOG_FORMAT

[api]
# Chat API origin
base_url = "http://localhost:8000"

# Request timeout in seconds
request_timeout_secs = 30

[router]
login_path = "/login"
root_path = "/"

# Landing pages after sign-in
default_landing = "/chat"
admin_landing = "/admin"

# What happens when a signed-in user opens the login or root page:
# "clear_session" signs them out, "redirect_to_landing" sends them on
authenticated_entry = "clear_session"

[render]
# Language assumed for code blocks without a tag. Tags with no bundled
# syntax (kotlin, swift, toml, dockerfile) render as plaintext; ts and
# tsx are highlighted as JavaScript.
# fallback_language = "plaintext"

# Highlight theme used by `chatdesk css`
theme = "InspiredGitHub"

# Render single line breaks as <br />
breaks = true

# Tables, strikethrough and task lists
gfm = true

[session]
# File holding the CLI session between runs
file = "~/.local/share/chatdesk/session.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/chatdesk/chatdesk.log"
"#
    .to_string()
}
