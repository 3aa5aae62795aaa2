//! Configuration loading and resolution
//!
//! Settings are resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Built-in default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable overriding the working-directory root
pub const ROOT_FOLDER_ENV: &str = "YTMP3_ROOT_FOLDER";

/// Environment variables consulted for the bot token, in order
pub const BOT_TOKEN_ENVS: &[&str] = &["YTMP3_BOT_TOKEN", "TELOXIDE_TOKEN"];

/// Default working-directory root, relative to the process working directory
pub const DEFAULT_ROOT_FOLDER: &str = "src";

/// Bootstrap configuration loaded from TOML file
///
/// Every field is optional in the file; missing values fall back to the
/// built-in defaults below.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Telegram bot token
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Root folder for per-request working directories
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Username allowed to run privileged commands (`/clear`)
    #[serde(default)]
    pub admin_username: Option<String>,

    /// yt-dlp executable name or path
    #[serde(default = "default_ytdlp_path")]
    pub ytdlp_path: String,

    /// MP3 bitrate passed to the transcoder (kbps)
    #[serde(default = "default_audio_quality")]
    pub audio_quality: String,

    /// Timeout for the fallback thumbnail download
    #[serde(default = "default_thumbnail_timeout_secs")]
    pub thumbnail_timeout_secs: u64,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            root_folder: None,
            admin_username: None,
            ytdlp_path: default_ytdlp_path(),
            audio_quality: default_audio_quality(),
            thumbnail_timeout_secs: default_thumbnail_timeout_secs(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_ytdlp_path() -> String {
    "yt-dlp".to_string()
}

fn default_audio_quality() -> String {
    "192".to_string()
}

fn default_thumbnail_timeout_secs() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from an explicit path, or the platform default
    ///
    /// An explicit path must exist. The platform default is optional: when it
    /// is absent the built-in defaults are used.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            info!("Loading config from {}", path.display());
            return Self::load(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => {
                info!("Loading config from {}", path.display());
                Self::load(&path)
            }
            _ => {
                debug!("No config file found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Platform configuration file path (`<config_dir>/ytmp3/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ytmp3").join("config.toml"))
}

/// Resolve the working-directory root
///
/// CLI argument → `YTMP3_ROOT_FOLDER` → TOML → `src`
pub fn resolve_root_folder(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Some(path) = non_empty_env(ROOT_FOLDER_ENV) {
        return PathBuf::from(path);
    }

    // Priority 3: TOML config file
    if let Some(path) = &config.root_folder {
        return path.clone();
    }

    // Priority 4: Built-in default
    PathBuf::from(DEFAULT_ROOT_FOLDER)
}

/// Resolve the bot token
///
/// CLI argument → `YTMP3_BOT_TOKEN` / `TELOXIDE_TOKEN` → TOML. There is no
/// default, so a missing token is a configuration error.
pub fn resolve_bot_token(cli_arg: Option<&str>, config: &TomlConfig) -> Result<String> {
    if let Some(token) = cli_arg.filter(|t| is_valid_token(t)) {
        return Ok(token.to_string());
    }

    for name in BOT_TOKEN_ENVS {
        if let Some(token) = non_empty_env(name) {
            info!("Bot token loaded from {}", name);
            return Ok(token);
        }
    }

    if let Some(token) = config.bot_token.as_deref().filter(|t| is_valid_token(t)) {
        info!("Bot token loaded from TOML config");
        return Ok(token.to_string());
    }

    Err(Error::Config(format!(
        "Bot token not configured. Set one of: --token, {}, or bot_token in {}",
        BOT_TOKEN_ENVS.join(", "),
        default_config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "config.toml".to_string())
    )))
}

/// Validate token (non-empty, non-whitespace)
pub fn is_valid_token(token: &str) -> bool {
    !token.trim().is_empty()
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| is_valid_token(v))
}
