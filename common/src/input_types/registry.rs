// Catalog of server-registered input types

use crate::config::InputTypeConfig;
use crate::input_types::converter::{
    BooleanConverter, Converter, DateTimeConverter, FloatConverter, IntegerConverter,
};
use config::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// A selectable value offered to clients for an input type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputTypeVariant {
    pub value: String,
    pub label: String,
}

/// A named kind of client-supplied value and how to convert it
#[derive(Debug, Clone, Serialize)]
pub struct InputType {
    pub code: String,
    pub label: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<InputTypeVariant>,
    #[serde(skip)]
    pub converter: Converter,
}

impl InputType {
    pub fn new(code: impl Into<String>, converter: Converter) -> Self {
        let code = code.into();
        Self {
            label: code.clone(),
            code,
            variants: Vec::new(),
            converter,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_variants(mut self, variants: Vec<InputTypeVariant>) -> Self {
        self.variants = variants;
        self
    }
}

impl TryFrom<&InputTypeConfig> for InputType {
    type Error = ConfigError;

    fn try_from(config: &InputTypeConfig) -> Result<Self, Self::Error> {
        let converter = config.converter.build().map_err(|e| {
            ConfigError::Message(format!(
                "Invalid converter for input type '{}': {}",
                config.code, e
            ))
        })?;

        Ok(InputType::new(&config.code, converter)
            .with_label(config.label.clone().unwrap_or_else(|| config.code.clone()))
            .with_variants(config.variants.clone()))
    }
}

/// Read-only input type catalog shared by all commands.
///
/// Populated once at startup. Lookup never fails; an absent code is the
/// caller's to report.
#[derive(Debug, Clone, Default)]
pub struct InputTypeRegistry {
    input_types: Vec<InputType>,
    index: HashMap<String, usize>,
}

impl InputTypeRegistry {
    /// Build a registry; for repeated codes the first registration wins
    pub fn new(input_types: impl IntoIterator<Item = InputType>) -> Self {
        let mut registry = Self::default();
        for input_type in input_types {
            if registry.index.contains_key(&input_type.code) {
                warn!(code = %input_type.code, "Ignoring duplicate input type registration");
                continue;
            }
            registry
                .index
                .insert(input_type.code.clone(), registry.input_types.len());
            registry.input_types.push(input_type);
        }
        debug!(count = registry.input_types.len(), "Input type registry built");
        registry
    }

    /// Built-in catalog: string, integer, float, boolean, date
    pub fn with_defaults() -> Self {
        Self::new([
            InputType::new("string", Converter::PassThrough).with_label("String"),
            InputType::new("integer", Converter::custom(IntegerConverter)).with_label("Integer"),
            InputType::new("float", Converter::custom(FloatConverter)).with_label("Float"),
            InputType::new("boolean", Converter::custom(BooleanConverter)).with_label("Boolean"),
            InputType::new("date", Converter::custom(DateTimeConverter)).with_label("Date"),
        ])
    }

    /// Build from configured input types, failing on the first bad converter
    pub fn from_config(configs: &[InputTypeConfig]) -> Result<Self, ConfigError> {
        let input_types = configs
            .iter()
            .map(InputType::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(input_types))
    }

    /// Exact-match lookup by code
    pub fn lookup(&self, code: &str) -> Option<&InputType> {
        self.index.get(code).map(|&i| &self.input_types[i])
    }

    /// All input types in registration order
    pub fn input_types(&self) -> &[InputType] {
        &self.input_types
    }

    pub fn variants(&self, code: &str) -> Option<&[InputTypeVariant]> {
        self.lookup(code).map(|input_type| input_type.variants.as_slice())
    }

    pub fn len(&self) -> usize {
        self.input_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input_types.is_empty()
    }
}
