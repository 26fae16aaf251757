use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, path::PathBuf, str::FromStr, time::Duration};
use url::Url;

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_MAX_HEIGHT, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_MAX_WIDTH,
    DEFAULT_QUALITY,
};
use crate::imaging::normalizer::NormalizeOptions;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

/// Which persistence collaborator backs the project store.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Rest,
    Local,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rest" => Ok(StoreBackend::Rest),
            "local" => Ok(StoreBackend::Local),
            _ => Err(ConfigError::Message(format!("Invalid store: {}", s))),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ImageSettings {
    #[serde(default = "default_max_width")]
    pub max_width: u32,

    #[serde(default = "default_max_height")]
    pub max_height: u32,

    #[serde(default = "default_quality")]
    pub quality: f32,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
}

impl Default for ImageSettings {
    fn default() -> Self {
        ImageSettings {
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
            quality: DEFAULT_QUALITY,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl From<&ImageSettings> for NormalizeOptions {
    fn from(settings: &ImageSettings) -> Self {
        NormalizeOptions {
            max_width: settings.max_width,
            max_height: settings.max_height,
            quality: settings.quality,
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: Url,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_store")]
    pub store: StoreBackend,

    #[serde(default = "default_local_store_path")]
    pub local_store_path: PathBuf,

    #[serde(default = "default_session_path")]
    pub session_path: PathBuf,

    #[serde(default)]
    pub image: ImageSettings,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Portfolio".to_string()
}
fn default_api_base_url() -> Url {
    Url::parse(DEFAULT_API_BASE_URL).expect("default API base URL is valid")
}
fn default_request_timeout() -> u64 {
    30
}
fn default_store() -> StoreBackend {
    StoreBackend::Rest
}
fn default_local_store_path() -> PathBuf {
    PathBuf::from("portfolio_items.json")
}
fn default_session_path() -> PathBuf {
    PathBuf::from(".portfolio_session")
}
fn default_max_width() -> u32 {
    DEFAULT_MAX_WIDTH
}
fn default_max_height() -> u32 {
    DEFAULT_MAX_HEIGHT
}
fn default_quality() -> f32 {
    DEFAULT_QUALITY
}
fn default_max_upload_bytes() -> u64 {
    DEFAULT_MAX_UPLOAD_BYTES
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            env: default_env(),
            name: default_name(),
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout(),
            store: default_store(),
            local_store_path: default_local_store_path(),
            session_path: default_session_path(),
            image: ImageSettings::default(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.image.max_width == 0 || self.image.max_height == 0 {
            errors.push("IMAGE max_width and max_height must be greater than zero".to_string());
        }
        if !(self.image.quality > 0.0 && self.image.quality <= 1.0) {
            errors.push(format!("IMAGE quality must be in (0, 1], got {}", self.image.quality));
        }
        if self.image.max_upload_bytes == 0 {
            errors.push("IMAGE max_upload_bytes must be greater than zero".to_string());
        }
        if self.request_timeout_secs == 0 {
            errors.push("REQUEST_TIMEOUT_SECS must be greater than zero".to_string());
        }
        if self.is_production() && self.store == StoreBackend::Rest && self.api_base_url.scheme() != "https" {
            errors.push("API_BASE_URL must use https in production".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions::from(&self.image)
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> String;
}

impl Redact for Url {
    fn redact(&self) -> String {
        if self.password().is_none() && self.username().is_empty() {
            return self.to_string();
        }
        let mut redacted = self.clone();
        let _ = redacted.set_username("[REDACTED]");
        let _ = redacted.set_password(None);
        redacted.to_string()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("api_base_url", &self.api_base_url.redact())
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("store", &self.store)
            .field("local_store_path", &self.local_store_path)
            .field("session_path", &self.session_path)
            .field("image", &self.image)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .finish()
    }
}
