use crate::domain::error::TranslateError;
use crate::infrastructure::providers::CUSTOM_PLATFORM;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_platform")]
    pub default_platform: String,
    pub default_target_lang: Option<String>,
    #[serde(default = "default_stream")]
    pub stream: bool,
    pub http_proxy: Option<String>,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub http: HttpSettings,
    #[serde(default)]
    pub fallback: FallbackDefaults,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Logging {
    #[serde(default = "default_enable")]
    pub enable: bool,
    pub path: Option<String>,
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Idle time allowed between two reads of a streamed body
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
    /// Total budget of a non-streamed call
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Last-resort values used when neither the caller, the environment nor the
/// platform profile provide one.
///
/// Built once at start-up from the `[fallback]` table and never re-read.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct FallbackDefaults {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            enable: true,
            path: None,
            level: "WARN".to_string(),
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            read_timeout_secs: default_read_timeout(),
            request_timeout_secs: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_platform: default_platform(),
            default_target_lang: None,
            stream: true,
            http_proxy: None,
            logging: Logging::default(),
            http: HttpSettings::default(),
            fallback: FallbackDefaults::default(),
        }
    }
}

// Defaults
fn default_platform() -> String {
    CUSTOM_PLATFORM.to_string()
}
fn default_stream() -> bool {
    true
}
fn default_enable() -> bool {
    true
}
fn default_log_level() -> String {
    "WARN".to_string()
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_read_timeout() -> u64 {
    180
}
fn default_request_timeout() -> u64 {
    60
}
fn default_user_agent() -> String {
    format!("lingo-relay/{}", env!("CARGO_PKG_VERSION"))
}

/// Map the configured level name to an `EnvFilter` directive
pub fn log_directive(level: &str) -> &'static str {
    match level.to_ascii_uppercase().as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARN" => "warn",
        "ERROR" => "error",
        _ => "warn",
    }
}

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("lingo-relay").join("config.toml"))
}

pub fn parse_config(content: &str) -> Result<Config, TranslateError> {
    Ok(toml::from_str::<Config>(content)?)
}

pub fn load_config() -> Result<Config, TranslateError> {
    let config_path = get_config_path();

    if let Some(path) = config_path {
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            match parse_config(&content) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    eprintln!(
                        "Warning: Failed to parse config file: {}. Using defaults.",
                        e
                    );
                }
            }
        }
    }

    Ok(Config::default())
}

pub fn generate_config_sample() -> Result<(), TranslateError> {
    let config_path = get_config_path();

    if let Some(path) = config_path {
        if path.exists() {
            eprintln!("Config file already exists at: {}", path.display());
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let sample = Config::default();
        let toml_content = toml::to_string_pretty(&sample)
            .map_err(|e| TranslateError::Init(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, toml_content)
            .map_err(|e| TranslateError::Init(format!("Failed to write config file: {}", e)))?;
        println!("Generated config file at: {}", path.display());
    } else {
        return Err(TranslateError::Init(
            "Cannot determine config directory".to_string(),
        ));
    }

    Ok(())
}
