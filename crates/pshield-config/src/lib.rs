use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use pshield_core::{NumberingOrder, ProtectOptions, SubstitutionMode};

/// Configuration for pshield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_language")]
    pub default_language: String,

    #[serde(default = "default_true")]
    pub translate_placeholders: bool,

    #[serde(default)]
    pub numbering: NumberingOrder,

    #[serde(default)]
    pub rules: RulesConfig,

    #[serde(default)]
    pub translator: TranslatorConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Built-in entity types to drop
    #[serde(default)]
    pub disabled: Vec<String>,

    /// Names found by the built-in name recognizer
    #[serde(default)]
    pub names: Vec<String>,

    #[serde(default = "default_name_priority")]
    pub name_priority: i32,

    #[serde(default)]
    pub custom: Vec<CustomRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomRule {
    pub name: String,
    pub priority: i32,
    #[serde(default)]
    pub mode: SubstitutionMode,
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslatorBackend {
    #[default]
    Dictionary,
    Http,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslatorConfig {
    #[serde(default)]
    pub backend: TranslatorBackend,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Extra dictionary entries: language -> entity name -> translation
    #[serde(default)]
    pub labels: BTreeMap<String, BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            translate_placeholders: true,
            numbering: NumberingOrder::default(),
            rules: RulesConfig::default(),
            translator: TranslatorConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            disabled: Vec::new(),
            names: Vec::new(),
            name_priority: default_name_priority(),
            custom: Vec::new(),
        }
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            backend: TranslatorBackend::default(),
            endpoint: default_endpoint(),
            api_key: None,
            timeout_ms: default_timeout_ms(),
            labels: BTreeMap::new(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_true() -> bool {
    true
}

fn default_name_priority() -> i32 {
    10
}

fn default_endpoint() -> String {
    "http://localhost:5001/translate".to_string()
}

fn default_timeout_ms() -> u64 {
    3000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl TranslatorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Config {
    /// Load config from default location or create default if not found
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();

        if path.exists() {
            Self::load_from(&path)
        } else {
            let config = Config::default();
            config.save_to(&path)?;
            Ok(config)
        }
    }

    /// Load config from an explicit file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "pshield", "pshield") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.pshield/config.toml")
        }
    }

    /// Protect options implied by this config
    pub fn protect_options(&self) -> ProtectOptions {
        ProtectOptions {
            translate_placeholders: self.translate_placeholders,
            target_language: None,
            numbering: self.numbering,
        }
    }
}
