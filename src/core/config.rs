//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.chatroom/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::core::message::{DEFAULT_AVATAR_URL, DEFAULT_UID};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChatConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub chat: RoomConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct IdentityConfig {
    pub uid: Option<String>,
    pub photo_url: Option<String>,
    /// Profile endpoint of the external identity service. Unset = static identity.
    pub endpoint: Option<String>,
    pub access_token: Option<String>,
}

/// Settings consumed by the external identity service, not by the chat core.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    pub app_name: Option<String>,
    pub api_domain: Option<String>,
    pub api_base_path: Option<String>,
    pub website_domain: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RoomConfig {
    pub placeholder: Option<String>,
    pub highlight_own_messages: Option<bool>,
    pub default_avatar_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_APP_NAME: &str = "SuperTokens Demo App";
pub const DEFAULT_API_DOMAIN: &str = "http://localhost:80";
pub const DEFAULT_API_BASE_PATH: &str = "/auth/";
pub const DEFAULT_APP_PORT: u16 = 3000;
pub const DEFAULT_PLACEHOLDER: &str = "say something nice";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub uid: String,
    pub photo_url: String,
    pub identity_endpoint: Option<String>,
    pub access_token: Option<String>,
    pub app_name: String,
    pub api_domain: String,
    pub api_base_path: String,
    pub website_domain: String,
    pub placeholder: String,
    pub highlight_own_messages: bool,
    pub default_avatar_url: String,
    pub log_level: LevelFilter,
}

/// Values given on the command line. `None` = flag not passed.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub uid: Option<String>,
    pub photo_url: Option<String>,
    pub identity_endpoint: Option<String>,
    pub log_level: Option<LevelFilter>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.chatroom/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".chatroom").join("config.toml"))
}

/// Load config from `~/.chatroom/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ChatConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ChatConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ChatConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(ChatConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: ChatConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# Chat Room Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# log_level = "debug"                 # "error", "warn", "info", "debug", "trace"

# [identity]
# uid = "abc"                         # Or set CHATROOM_UID
# photo_url = ""                      # Or set CHATROOM_PHOTO_URL
# endpoint = "http://localhost:80/api/v1/user/me"   # Or CHATROOM_IDENTITY_ENDPOINT
# access_token = "..."                # Or set CHATROOM_ACCESS_TOKEN

# [auth]
# app_name = "SuperTokens Demo App"
# api_domain = "http://localhost:80"
# api_base_path = "/auth/"
# website_domain = "http://localhost:3000"   # Or APP_URL / NEXT_PUBLIC_APP_URL / APP_PORT

# [chat]
# placeholder = "say something nice"
# highlight_own_messages = true       # false = every message uses the "sent" style
# default_avatar_url = "https://api.adorable.io/avatars/23/abott@adorable.png"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ChatConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], with the environment lookup injected.
pub fn resolve_with_env<F>(config: &ChatConfig, cli: &CliOverrides, env: F) -> ResolvedConfig
where
    F: Fn(&str) -> Option<String>,
{
    // Uid: CLI → env → config → default
    let uid = cli
        .uid
        .clone()
        .or_else(|| env("CHATROOM_UID"))
        .or_else(|| config.identity.uid.clone())
        .unwrap_or_else(|| DEFAULT_UID.to_string());

    let photo_url = cli
        .photo_url
        .clone()
        .or_else(|| env("CHATROOM_PHOTO_URL"))
        .or_else(|| config.identity.photo_url.clone())
        .unwrap_or_default();

    let identity_endpoint = cli
        .identity_endpoint
        .clone()
        .or_else(|| env("CHATROOM_IDENTITY_ENDPOINT"))
        .or_else(|| config.identity.endpoint.clone());

    // Token: env → config (never from the command line, it would land in shell history)
    let access_token =
        env("CHATROOM_ACCESS_TOKEN").or_else(|| config.identity.access_token.clone());

    // Website domain: APP_URL → NEXT_PUBLIC_APP_URL → config → localhost:APP_PORT
    let website_domain = env("APP_URL")
        .or_else(|| env("NEXT_PUBLIC_APP_URL"))
        .or_else(|| config.auth.website_domain.clone())
        .unwrap_or_else(|| {
            let port = env("APP_PORT")
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(DEFAULT_APP_PORT);
            format!("http://localhost:{port}")
        });

    let log_level = cli
        .log_level
        .or_else(|| {
            config
                .general
                .log_level
                .as_deref()
                .and_then(|level| level.parse::<LevelFilter>().ok())
        })
        .unwrap_or(DEFAULT_LOG_LEVEL);

    ResolvedConfig {
        uid,
        photo_url,
        identity_endpoint,
        access_token,
        app_name: config
            .auth
            .app_name
            .clone()
            .unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
        api_domain: config
            .auth
            .api_domain
            .clone()
            .unwrap_or_else(|| DEFAULT_API_DOMAIN.to_string()),
        api_base_path: config
            .auth
            .api_base_path
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE_PATH.to_string()),
        website_domain,
        placeholder: config
            .chat
            .placeholder
            .clone()
            .unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_string()),
        highlight_own_messages: config.chat.highlight_own_messages.unwrap_or(true),
        default_avatar_url: config
            .chat
            .default_avatar_url
            .clone()
            .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string()),
        log_level,
    }
}
