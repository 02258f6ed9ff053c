//! Presence-style rules. These are the rules that still run on empty values.

use super::{NamedParams, Rule, param};
use crate::error::ConfigError;
use crate::primitives::{display_value, has_path, is_empty_value, resolve_value};
use serde_json::Value;

/// The value must be present and non-empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct Required;

impl Rule for Required {
    fn rule_name(&self) -> &str {
        "required"
    }

    fn validate(&self, _: &str, value: &Value, _: &NamedParams, _: &Value) -> Result<bool, ConfigError> {
        Ok(!is_empty_value(value))
    }

    fn message(&self, _: &str, _: &NamedParams, _: &Value, _: &Value) -> String {
        "The :attribute field is required.".to_string()
    }
}

/// When the field is present it must not be empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct Filled;

impl Rule for Filled {
    fn rule_name(&self) -> &str {
        "filled"
    }

    fn validate(&self, field: &str, value: &Value, _: &NamedParams, data: &Value) -> Result<bool, ConfigError> {
        Ok(!has_path(data, field) || !is_empty_value(value))
    }

    fn message(&self, _: &str, _: &NamedParams, _: &Value, _: &Value) -> String {
        "The :attribute field must have a value.".to_string()
    }
}

/// The key must exist in the input, even if its value is null.
#[derive(Clone, Copy, Debug, Default)]
pub struct Present;

impl Rule for Present {
    fn rule_name(&self) -> &str {
        "present"
    }

    fn validate(&self, field: &str, _: &Value, _: &NamedParams, data: &Value) -> Result<bool, ConfigError> {
        Ok(has_path(data, field))
    }

    fn message(&self, _: &str, _: &NamedParams, _: &Value, _: &Value) -> String {
        "The :attribute field must be present.".to_string()
    }
}

/// Modifier; the engine handles it before dispatch.
#[derive(Clone, Copy, Debug, Default)]
pub struct Nullable;

impl Rule for Nullable {
    fn rule_name(&self) -> &str {
        "nullable"
    }

    fn validate(&self, _: &str, _: &Value, _: &NamedParams, _: &Value) -> Result<bool, ConfigError> {
        Ok(true)
    }

    fn message(&self, _: &str, _: &NamedParams, _: &Value, _: &Value) -> String {
        String::new()
    }
}

/// Modifier; the engine handles it before dispatch.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sometimes;

impl Rule for Sometimes {
    fn rule_name(&self) -> &str {
        "sometimes"
    }

    fn validate(&self, _: &str, _: &Value, _: &NamedParams, _: &Value) -> Result<bool, ConfigError> {
        Ok(true)
    }

    fn message(&self, _: &str, _: &NamedParams, _: &Value, _: &Value) -> String {
        String::new()
    }
}

/// The value must equal `<field>_confirmation` (or the field named by the parameter).
#[derive(Clone, Copy, Debug, Default)]
pub struct Confirmed;

impl Rule for Confirmed {
    fn rule_name(&self) -> &str {
        "confirmed"
    }

    fn parameter_names(&self) -> &[&'static str] {
        &["custom_field"]
    }

    fn validate(&self, field: &str, value: &Value, params: &NamedParams, data: &Value) -> Result<bool, ConfigError> {
        let confirmation = match param(params, "custom_field").map(display_value) {
            Some(name) if !name.is_empty() => name,
            _ => format!("{}_confirmation", field),
        };

        Ok(resolve_value(data, &confirmation).is_some_and(|other| other == value))
    }

    fn message(&self, _: &str, _: &NamedParams, _: &Value, _: &Value) -> String {
        "The :attribute confirmation does not match.".to_string()
    }
}
