//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::agent::llm::ollama::DEFAULT_OLLAMA_HOST;
use crate::agent::DEFAULT_SYSTEM_PROMPT;
use crate::error::Error;
use crate::Result;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Ollama model to use
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the Ollama server
    #[serde(default = "default_ollama_host")]
    pub ollama_host: String,

    /// Maximum model calls per user turn
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// System prompt that opens every conversation
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_ollama_host() -> String {
    DEFAULT_OLLAMA_HOST.to_string()
}

fn default_max_iterations() -> usize {
    20
}

fn default_temperature() -> f32 {
    0.7
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            ollama_host: default_ollama_host(),
            max_iterations: default_max_iterations(),
            temperature: default_temperature(),
            system_prompt: default_system_prompt(),
        }
    }
}

impl Config {
    /// Apply overrides from a variable lookup (`OLLAMA_HOST`, `TOOLOOP_MODEL`).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("OLLAMA_HOST").filter(|h| !h.trim().is_empty()) {
            self.ollama_host = normalize_host(&host);
        }
        if let Some(model) = lookup("TOOLOOP_MODEL").filter(|m| !m.trim().is_empty()) {
            self.model = model.trim().to_string();
        }
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }
}

/// `OLLAMA_HOST` is often set without a scheme (`0.0.0.0:11434`).
fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{}", host)
    }
}

/// Get the config directory path
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tooloop")
}

/// Get the config file path
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Load configuration from the default path, falling back to defaults,
/// then apply environment overrides
pub fn load() -> Result<Config> {
    let path = config_path();

    let mut config = if path.exists() {
        load_from(&path)?
    } else {
        debug!("No config at {:?}, using defaults", path);
        Config::default()
    };

    config.apply_env_overrides();
    Ok(config)
}

/// Load configuration from a specific file
pub fn load_from(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid config at {:?}: {}", path, e)))
}

/// Save configuration to a specific file
pub fn save_to(config: &Config, path: &Path) -> Result<()> {
    // Create parent directory
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Write a default config file, refusing to overwrite unless `force` is set
pub fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::Config(format!(
            "Config already exists at {:?}. Use --force to overwrite.",
            path
        )));
    }
    save_to(&Config::default(), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model, "llama3.2:3b");
        assert_eq!(config.ollama_host, "http://localhost:11434");
        assert_eq!(config.max_iterations, 20);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"model": "qwen2.5:7b"}"#).unwrap();
        assert_eq!(config.model, "qwen2.5:7b");
        assert_eq!(config.max_iterations, 20);
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.max_iterations = 5;
        save_to(&config, &path).unwrap();

        let loaded = load_from(&path).unwrap();
        assert_eq!(loaded.max_iterations, 5);
        assert_eq!(loaded.model, config.model);
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        init(&path, false).unwrap();
        assert!(matches!(init(&path, false), Err(Error::Config(_))));
        assert!(init(&path, true).is_ok());
    }

    #[test]
    fn test_invalid_config_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(load_from(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> =
            [("OLLAMA_HOST", "0.0.0.0:11434/"), ("TOOLOOP_MODEL", " mistral ")]
                .into_iter()
                .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.ollama_host, "http://0.0.0.0:11434");
        assert_eq!(config.model, "mistral");
    }
}
