// Configuration management with layered configuration (file, env)

use crate::input_types::{ConverterKind, InputTypeVariant};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Main settings structure containing all configuration options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub observability: ObservabilityConfig,
    /// Contents of the input type registry, in catalog order
    #[serde(default = "default_input_types")]
    pub input_types: Vec<InputTypeConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub metrics_port: Option<u16>,
    pub tracing_endpoint: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_port: None,
            tracing_endpoint: None,
        }
    }
}

/// One input type as declared in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputTypeConfig {
    pub code: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub converter: ConverterKind,
    #[serde(default)]
    pub variants: Vec<InputTypeVariant>,
}

impl InputTypeConfig {
    fn builtin(code: &str, label: &str, converter: ConverterKind) -> Self {
        Self {
            code: code.to_string(),
            label: Some(label.to_string()),
            converter,
            variants: Vec::new(),
        }
    }
}

/// Input types available when configuration declares none
pub fn default_input_types() -> Vec<InputTypeConfig> {
    vec![
        InputTypeConfig::builtin("string", "String", ConverterKind::PassThrough),
        InputTypeConfig::builtin("integer", "Integer", ConverterKind::Integer),
        InputTypeConfig::builtin("float", "Float", ConverterKind::Float),
        InputTypeConfig::builtin("boolean", "Boolean", ConverterKind::Boolean),
        InputTypeConfig::builtin("date", "Date", ConverterKind::DateTime),
    ]
}

impl Settings {
    /// Load configuration with layered precedence: defaults → file → env
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("config")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Local overrides (not committed to git)
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), String> {
        if self.observability.log_level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }
        if self.observability.metrics_port == Some(0) {
            return Err("Metrics port must be greater than 0".to_string());
        }

        let mut seen = HashSet::new();
        for input_type in &self.input_types {
            if input_type.code.trim().is_empty() {
                return Err("Input type code cannot be empty".to_string());
            }
            if !seen.insert(input_type.code.as_str()) {
                return Err(format!("Duplicate input type code: {}", input_type.code));
            }
            if let Err(e) = input_type.converter.build() {
                return Err(format!(
                    "Invalid converter for input type '{}': {}",
                    input_type.code, e
                ));
            }
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            observability: ObservabilityConfig::default(),
            input_types: default_input_types(),
        }
    }
}
