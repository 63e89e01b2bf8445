use crate::error::ConfigError;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::sync::OnceLock;
use toml::Table;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub transcription: TranscriberConfig,

    #[serde(default)]
    pub generation: Option<GeneratorConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TranscriberConfig {
    #[serde(default = "default_backend")]
    pub backend: String,

    #[serde(default = "default_whisper_model")]
    pub model: String,

    #[serde(default = "default_device")]
    pub device: String,

    #[serde(default)]
    pub params: Table,
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            model: default_whisper_model(),
            device: default_device(),
            params: Table::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneratorConfig {
    #[serde(default = "default_backend")]
    pub backend: String,

    pub project_id: String,

    pub location: String,

    #[serde(default = "default_generation_model")]
    pub model_name: String,

    #[serde(default)]
    pub params: Table,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_backend() -> String {
    "null".to_string()
}

fn default_whisper_model() -> String {
    "large".to_string()
}

fn default_device() -> String {
    "cpu".to_string()
}

fn default_generation_model() -> String {
    "text-bison@latest".to_string()
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex is valid"))
}

/// Interpolate `${VAR}` patterns with environment variable values.
fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut result = input.to_string();
    let mut errors = Vec::new();

    for cap in env_var_pattern().captures_iter(input) {
        let var_name = &cap[1];
        match std::env::var(var_name) {
            Ok(val) => {
                result = result.replace(&cap[0], &val);
            }
            Err(_) => {
                errors.push(var_name.to_string());
            }
        }
    }

    if let Some(first_missing) = errors.into_iter().next() {
        return Err(ConfigError::EnvVarNotFound(first_missing));
    }

    Ok(result)
}

impl AppConfig {
    /// Load configuration from a TOML file, with environment variable interpolation.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let interpolated = interpolate_env_vars(s)?;
        let config: AppConfig = toml::from_str(&interpolated)?;
        Ok(config)
    }
}
