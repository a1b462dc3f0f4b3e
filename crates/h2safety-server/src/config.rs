//! Server configuration

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

/// Document store backend
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    #[default]
    #[serde(alias = "mongo")]
    MongoDB,
    Memory,
}

impl std::str::FromStr for DatabaseType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(DatabaseType::MongoDB),
            "memory" => Ok(DatabaseType::Memory),
            other => anyhow::bail!(
                "Invalid DATABASE_TYPE '{}'. Must be one of: mongodb, memory",
                other
            ),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database_type: DatabaseType,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_database_name")]
    pub database_name: String,

    #[serde(default = "default_rag_service_url")]
    pub rag_service_url: String,

    #[serde(default = "default_llm_api_url")]
    pub llm_api_url: String,

    #[serde(default)]
    pub llm_api_key: Option<String>,

    #[serde(default = "default_llm_model")]
    pub llm_model: String,

    #[serde(default = "default_rag_timeout_secs")]
    pub rag_timeout_secs: u64,

    #[serde(default = "default_llm_timeout_secs")]
    pub llm_timeout_secs: u64,

    #[serde(default = "default_session_ttl_days")]
    pub session_ttl_days: i64,

    /// Adds `Secure` to the session cookie
    #[serde(default)]
    pub secure_cookies: bool,

    /// Comma separated origins, any origin when unset
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_database_url() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_database_name() -> String {
    "h2safety".to_string()
}

fn default_rag_service_url() -> String {
    "http://localhost:5002/ask".to_string()
}

fn default_llm_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_rag_timeout_secs() -> u64 {
    60
}

fn default_llm_timeout_secs() -> u64 {
    180
}

fn default_session_ttl_days() -> i64 {
    7
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_type = match var("DATABASE_TYPE") {
            Some(value) => value.parse()?,
            None => DatabaseType::default(),
        };
        let host = var("H2_SERVER_HOST").unwrap_or_else(default_host);
        let port = var("H2_SERVER_PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(default_port);
        let database_url = var("DATABASE_URL")
            .or_else(|| var("MONGODB_URL"))
            .unwrap_or_else(default_database_url);
        let database_name = var("DATABASE_NAME").unwrap_or_else(default_database_name);
        let rag_service_url = var("RAG_SERVICE_URL").unwrap_or_else(default_rag_service_url);
        let llm_api_url = var("LLM_API_URL").unwrap_or_else(default_llm_api_url);
        let llm_api_key = var("OPENAI_API_KEY")
            .or_else(|| var("LLM_API_KEY"))
            .filter(|key| !key.trim().is_empty());
        let llm_model = var("LLM_MODEL").unwrap_or_else(default_llm_model);
        let rag_timeout_secs = var("RAG_TIMEOUT_SECS")
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(default_rag_timeout_secs);
        let llm_timeout_secs = var("LLM_TIMEOUT_SECS")
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(default_llm_timeout_secs);
        let session_ttl_days = var("SESSION_TTL_DAYS")
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(default_session_ttl_days);
        let secure_cookies = var("SECURE_COOKIES")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS");

        Ok(Self {
            database_type,
            host,
            port,
            database_url,
            database_name,
            rag_service_url,
            llm_api_url,
            llm_api_key,
            llm_model,
            rag_timeout_secs,
            llm_timeout_secs,
            session_ttl_days,
            secure_cookies,
            cors_allowed_origins,
        })
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config file")?;
        Ok(config)
    }

    /// The LLM key, required before the server starts
    pub fn require_llm_api_key(&self) -> Result<&str> {
        self.llm_api_key
            .as_deref()
            .context("Missing OPENAI_API_KEY (or LLM_API_KEY) for report and insight generation")
    }

    pub fn rag_timeout(&self) -> Duration {
        Duration::from_secs(self.rag_timeout_secs)
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    pub fn allowed_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_type: DatabaseType::default(),
            host: default_host(),
            port: default_port(),
            database_url: default_database_url(),
            database_name: default_database_name(),
            rag_service_url: default_rag_service_url(),
            llm_api_url: default_llm_api_url(),
            llm_api_key: None,
            llm_model: default_llm_model(),
            rag_timeout_secs: default_rag_timeout_secs(),
            llm_timeout_secs: default_llm_timeout_secs(),
            session_ttl_days: default_session_ttl_days(),
            secure_cookies: false,
            cors_allowed_origins: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.database_type, DatabaseType::MongoDB);
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_name, "h2safety");
        assert_eq!(config.rag_service_url, "http://localhost:5002/ask");
        assert_eq!(config.rag_timeout(), Duration::from_secs(60));
        assert_eq!(config.session_ttl_days, 7);
        assert!(config.require_llm_api_key().is_err());
        assert!(config.allowed_origins().is_empty());
    }

    #[test]
    fn environment_overrides_are_read() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_TYPE", "memory"),
            ("H2_SERVER_PORT", "9090"),
            ("MONGODB_URL", "mongodb://db:27017"),
            ("LLM_API_KEY", "sk-test"),
            ("SECURE_COOKIES", "TRUE"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
        ]))
        .unwrap();
        assert_eq!(config.database_type, DatabaseType::Memory);
        assert_eq!(config.port, 9090);
        assert_eq!(config.database_url, "mongodb://db:27017");
        assert_eq!(config.require_llm_api_key().unwrap(), "sk-test");
        assert!(config.secure_cookies);
        assert_eq!(
            config.allowed_origins(),
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn openai_key_takes_precedence() {
        let config = Config::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-openai"),
            ("LLM_API_KEY", "sk-other"),
        ]))
        .unwrap();
        assert_eq!(config.llm_api_key.as_deref(), Some("sk-openai"));
    }

    #[test]
    fn unknown_database_type_is_rejected() {
        let err = Config::from_lookup(lookup(&[("DATABASE_TYPE", "sqlite")])).unwrap_err();
        assert!(err.to_string().contains("Invalid DATABASE_TYPE 'sqlite'"));
        assert_eq!("Mongo".parse::<DatabaseType>().unwrap(), DatabaseType::MongoDB);
    }

    #[test]
    fn toml_file_fills_missing_fields_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "database_type = \"memory\"\nport = 3001\nllm_api_key = \"sk-file\""
        )
        .unwrap();

        let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.database_type, DatabaseType::Memory);
        assert_eq!(config.port, 3001);
        assert_eq!(config.llm_model, "gpt-4o-mini");
        assert_eq!(config.llm_timeout(), Duration::from_secs(180));
    }
}
