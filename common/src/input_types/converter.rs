// Value converters for client-supplied job data

use crate::errors::ConversionError;
use crate::models::JobDataValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Turns a raw client value into a typed job data value
pub trait ValueConverter: Send + Sync {
    fn convert(&self, raw: &Value) -> Result<JobDataValue, ConversionError>;
}

/// Conversion rule attached to an input type
#[derive(Clone, Default)]
pub enum Converter {
    /// Hand the raw value to the scheduler unchanged
    #[default]
    PassThrough,
    Custom(Arc<dyn ValueConverter>),
}

impl Converter {
    pub fn custom(converter: impl ValueConverter + 'static) -> Self {
        Converter::Custom(Arc::new(converter))
    }

    pub fn convert(&self, raw: &Value) -> Result<JobDataValue, ConversionError> {
        match self {
            Converter::PassThrough => Ok(JobDataValue::Raw(raw.clone())),
            Converter::Custom(converter) => converter.convert(raw),
        }
    }

    pub fn is_pass_through(&self) -> bool {
        matches!(self, Converter::PassThrough)
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Converter::PassThrough => f.write_str("PassThrough"),
            Converter::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Built-in converter selection as it appears in configuration
///
/// ```toml
/// converter = { type = "regex", pattern = "^[A-Z]{3}$" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConverterKind {
    #[default]
    PassThrough,
    Integer,
    Float,
    Boolean,
    DateTime,
    Regex {
        pattern: String,
    },
}

impl ConverterKind {
    /// Build the converter; fails only for an invalid regex pattern
    pub fn build(&self) -> Result<Converter, regex::Error> {
        let converter = match self {
            ConverterKind::PassThrough => Converter::PassThrough,
            ConverterKind::Integer => Converter::custom(IntegerConverter),
            ConverterKind::Float => Converter::custom(FloatConverter),
            ConverterKind::Boolean => Converter::custom(BooleanConverter),
            ConverterKind::DateTime => Converter::custom(DateTimeConverter),
            ConverterKind::Regex { pattern } => Converter::custom(RegexConverter::new(pattern)?),
        };
        Ok(converter)
    }
}

fn type_name(raw: &Value) -> &'static str {
    match raw {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn required(raw: &Value) -> Result<(), ConversionError> {
    match raw {
        Value::Null => Err(ConversionError::new("A value is required")),
        Value::String(s) if s.trim().is_empty() => {
            Err(ConversionError::new("A value is required"))
        }
        _ => Ok(()),
    }
}

/// Signed 64-bit integers from numbers or numeric strings
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerConverter;

impl ValueConverter for IntegerConverter {
    fn convert(&self, raw: &Value) -> Result<JobDataValue, ConversionError> {
        required(raw)?;
        match raw {
            Value::Number(n) => n
                .as_i64()
                .map(JobDataValue::Integer)
                .ok_or_else(|| ConversionError::new(format!("'{}' is not a valid integer", n))),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(JobDataValue::Integer)
                .map_err(|_| ConversionError::new(format!("'{}' is not a valid integer", s))),
            other => Err(ConversionError::new(format!(
                "Expected an integer but got {}",
                type_name(other)
            ))),
        }
    }
}

/// Finite floating point numbers from numbers or numeric strings
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatConverter;

impl ValueConverter for FloatConverter {
    fn convert(&self, raw: &Value) -> Result<JobDataValue, ConversionError> {
        required(raw)?;
        let parsed = match raw {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            other => {
                return Err(ConversionError::new(format!(
                    "Expected a number but got {}",
                    type_name(other)
                )))
            }
        };

        match parsed {
            Some(value) if value.is_finite() => Ok(JobDataValue::Float(value)),
            _ => Err(ConversionError::new(format!(
                "'{}' is not a valid number",
                raw.as_str().map(str::to_string).unwrap_or_else(|| raw.to_string())
            ))),
        }
    }
}

/// Booleans from true/false, yes/no, 1/0 (case-insensitive)
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanConverter;

impl ValueConverter for BooleanConverter {
    fn convert(&self, raw: &Value) -> Result<JobDataValue, ConversionError> {
        required(raw)?;
        match raw {
            Value::Bool(b) => Ok(JobDataValue::Boolean(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(1) => Ok(JobDataValue::Boolean(true)),
                Some(0) => Ok(JobDataValue::Boolean(false)),
                _ => Err(ConversionError::new(format!("'{}' is not a valid boolean", n))),
            },
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(JobDataValue::Boolean(true)),
                "false" | "no" | "0" => Ok(JobDataValue::Boolean(false)),
                _ => Err(ConversionError::new(format!("'{}' is not a valid boolean", s))),
            },
            other => Err(ConversionError::new(format!(
                "Expected a boolean but got {}",
                type_name(other)
            ))),
        }
    }
}

/// UTC timestamps from RFC 3339 strings, or naive date/date-time strings read as UTC
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeConverter;

impl DateTimeConverter {
    const NAIVE_DATE_TIME_FORMAT: &'static str = "%Y-%m-%d %H:%M:%S";
    const NAIVE_DATE_FORMAT: &'static str = "%Y-%m-%d";

    fn parse(input: &str) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
            return Some(parsed.with_timezone(&Utc));
        }
        if let Ok(parsed) = NaiveDateTime::parse_from_str(input, Self::NAIVE_DATE_TIME_FORMAT) {
            return Some(parsed.and_utc());
        }
        NaiveDate::parse_from_str(input, Self::NAIVE_DATE_FORMAT)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|midnight| midnight.and_utc())
    }
}

impl ValueConverter for DateTimeConverter {
    fn convert(&self, raw: &Value) -> Result<JobDataValue, ConversionError> {
        required(raw)?;
        match raw {
            Value::String(s) => Self::parse(s.trim())
                .map(JobDataValue::DateTime)
                .ok_or_else(|| ConversionError::new(format!("'{}' is not a valid date", s))),
            other => Err(ConversionError::new(format!(
                "Expected a date string but got {}",
                type_name(other)
            ))),
        }
    }
}

/// Text that must match a pattern
#[derive(Debug, Clone)]
pub struct RegexConverter {
    pattern: Regex,
}

impl RegexConverter {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }
}

impl ValueConverter for RegexConverter {
    fn convert(&self, raw: &Value) -> Result<JobDataValue, ConversionError> {
        let text = raw.as_str().ok_or_else(|| {
            ConversionError::new(format!("Expected a string but got {}", type_name(raw)))
        })?;

        if self.pattern.is_match(text) {
            Ok(JobDataValue::Text(text.to_string()))
        } else {
            Err(ConversionError::new(format!(
                "'{}' does not match pattern {}",
                text,
                self.pattern.as_str()
            )))
        }
    }
}
