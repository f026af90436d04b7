use std::env;
use std::time::Duration;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const DEFAULT_DATABASE: &str = "trip_planner";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_TIMEOUT_SECS: u64 = 30;

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => {
                write!(f, "{} has an invalid value: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    /// Falls back to the database named in the URI, then to `trip_planner`.
    pub database: Option<String>,
}

impl MongoConfig {
    pub fn database_or(&self, from_uri: Option<&str>) -> String {
        self.database
            .clone()
            .or_else(|| from_uri.map(str::to_string))
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongodb: MongoConfig,
    pub gemini: GeminiConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match get("PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value })?,
            None => PORT,
        };
        let timeout_secs = match get("GEMINI_TIMEOUT_SECS") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                key: "GEMINI_TIMEOUT_SECS",
                value,
            })?,
            None => DEFAULT_GEMINI_TIMEOUT_SECS,
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| HOST.to_string()),
            port,
            mongodb: MongoConfig {
                uri: get("MONGODB_URI").ok_or(ConfigError::Missing("MONGODB_URI"))?,
                database: get("MONGODB_DATABASE"),
            },
            gemini: GeminiConfig {
                api_key: get("GEMINI_API_KEY").ok_or(ConfigError::Missing("GEMINI_API_KEY"))?,
                model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                api_base: get("GEMINI_API_BASE")
                    .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}
