use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Process-wide settings, loaded once at startup and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub reasoning: ReasoningConfig,
    pub search: SearchConfig,
    /// Blocked in addition to the built-in list, for every request
    pub blocked_domains: Vec<String>,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasoningConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            reasoning: ReasoningConfig::default(),
            search: SearchConfig::default(),
            blocked_domains: Vec::new(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
        }
    }
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: extract::llm::DEFAULT_GEMINI_MODEL.to_string(),
            base_url: extract::llm::DEFAULT_GEMINI_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: None,
        }
    }
}

impl ReasoningConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// Read `FACTCHECK_CONFIG` (if set), then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var("FACTCHECK_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("BIND_ADDR") {
            self.server.bind_addr = addr;
        }
        if let Some(key) = lookup("GEMINI_API_KEY") {
            self.reasoning.api_key = key;
        }
        if let Some(model) = lookup("GEMINI_MODEL") {
            self.reasoning.model = model;
        }
        if let Some(url) = lookup("GEMINI_BASE_URL") {
            self.reasoning.base_url = url;
        }
        if let Some(secs) = lookup("REASONING_TIMEOUT_SECS") {
            self.reasoning.timeout_secs = secs
                .trim()
                .parse()
                .context("REASONING_TIMEOUT_SECS must be a whole number of seconds")?;
        }
        if let Some(secs) = lookup("SEARCH_TIMEOUT_SECS") {
            self.search.timeout_secs = secs
                .trim()
                .parse()
                .context("SEARCH_TIMEOUT_SECS must be a whole number of seconds")?;
        }
        if let Some(domains) = lookup("BLOCKED_DOMAINS") {
            self.blocked_domains.extend(
                domains
                    .split(',')
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(str::to_string),
            );
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            self.log_format = match format.trim().to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            };
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.reasoning.api_key.trim().is_empty() {
            anyhow::bail!("GEMINI_API_KEY is not set");
        }
        if self.reasoning.timeout_secs == 0 || self.search.timeout_secs == 0 {
            anyhow::bail!("timeouts must be greater than zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind_addr, "127.0.0.1:8000");
        assert_eq!(config.reasoning.model, "gemini-2.5-flash");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(lookup(&[
                ("GEMINI_API_KEY", "secret"),
                ("REASONING_TIMEOUT_SECS", "45"),
                ("BLOCKED_DOMAINS", "tabloid.example, ,rumors.net"),
                ("LOG_FORMAT", "JSON"),
            ]))
            .unwrap();

        assert_eq!(config.reasoning.api_key, "secret");
        assert_eq!(config.reasoning.timeout(), Duration::from_secs(45));
        assert_eq!(config.blocked_domains, ["tabloid.example", "rumors.net"]);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_timeout_is_rejected() {
        let mut config = AppConfig::default();
        assert!(config.apply_overrides(lookup(&[("SEARCH_TIMEOUT_SECS", "soon")])).is_err());
    }

    #[test]
    fn test_partial_json_file_keeps_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"search": {"timeout_secs": 5}, "log_format": "json"}"#).unwrap();

        assert_eq!(config.search.timeout_secs, 5);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.reasoning.timeout_secs, 30);
    }
}
