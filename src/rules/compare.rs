//! Rules comparing a value against other fields or fixed sets.

use super::{NamedParams, Rule, param, param_list, required_param};
use crate::error::ConfigError;
use crate::primitives::{display_value, resolve_value};
use serde_json::Value;

/// Scalar equality that lets a parsed rule parameter (`in:1,2`) match the
/// textual input it was written for (`"1"`).
fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::String(_), Value::Number(_) | Value::Bool(_))
        | (Value::Number(_) | Value::Bool(_), Value::String(_)) => display_value(a) == display_value(b),
        _ => a == b,
    }
}

// ─── same / different ────────────────────────────────────────────────────────

/// The value must equal the value of another field.
#[derive(Clone, Copy, Debug, Default)]
pub struct Same;

impl Rule for Same {
    fn rule_name(&self) -> &str {
        "same"
    }

    fn parameter_names(&self) -> &[&'static str] {
        &["other"]
    }

    fn validate(&self, _: &str, value: &Value, params: &NamedParams, data: &Value) -> Result<bool, ConfigError> {
        let other = display_value(required_param(params, "same", "other")?);
        match resolve_value(data, &other) {
            Some(Value::Null) | None => Ok(false),
            Some(other_value) => Ok(other_value == value),
        }
    }

    fn message(&self, _: &str, _: &NamedParams, _: &Value, _: &Value) -> String {
        "The :attribute and :other must match.".to_string()
    }
}

/// The value must differ from another field's value. An absent other field passes.
#[derive(Clone, Copy, Debug, Default)]
pub struct Different;

impl Rule for Different {
    fn rule_name(&self) -> &str {
        "different"
    }

    fn parameter_names(&self) -> &[&'static str] {
        &["other_field"]
    }

    fn validate(&self, _: &str, value: &Value, params: &NamedParams, data: &Value) -> Result<bool, ConfigError> {
        let other = display_value(required_param(params, "different", "other_field")?);
        match resolve_value(data, &other) {
            Some(Value::Null) | None => Ok(true),
            Some(other_value) => Ok(other_value != value),
        }
    }

    fn message(&self, _: &str, _: &NamedParams, _: &Value, _: &Value) -> String {
        "The :attribute and :other_field must be different.".to_string()
    }
}

// ─── in ──────────────────────────────────────────────────────────────────────

/// The value must be one of a list: `in:draft,published` or [`In::of`].
#[derive(Clone, Debug, Default)]
pub struct In {
    values: Option<Vec<Value>>,
}

impl In {
    pub fn of<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            values: Some(values.into_iter().map(Into::into).collect()),
        }
    }
}

impl Rule for In {
    fn rule_name(&self) -> &str {
        "in"
    }

    fn parameter_names(&self) -> &[&'static str] {
        &["values"]
    }

    fn bound_params(&self) -> NamedParams {
        let mut params = NamedParams::new();
        if let Some(values) = &self.values {
            params.insert("values".to_string(), Value::Array(values.clone()));
        }
        params
    }

    fn validate(&self, _: &str, value: &Value, params: &NamedParams, _: &Value) -> Result<bool, ConfigError> {
        let allowed = match &self.values {
            Some(values) => values.clone(),
            None => param(params, "values").map(param_list).unwrap_or_default(),
        };

        Ok(allowed.iter().any(|candidate| loosely_equal(candidate, value)))
    }

    fn message(&self, _: &str, _: &NamedParams, _: &Value, _: &Value) -> String {
        "The :attribute must be one of: :values.".to_string()
    }
}

// ─── enum ────────────────────────────────────────────────────────────────────

/// The value must be one of an enumeration's backing values.
///
/// Built with [`EnumRule::new`] the cases are fixed; as a string token
/// (`enum:small,medium,large`) the cases come from the parameters. With
/// neither, nothing passes.
#[derive(Clone, Debug, Default)]
pub struct EnumRule {
    cases: Option<Vec<Value>>,
}

impl EnumRule {
    pub fn new<I, V>(cases: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            cases: Some(cases.into_iter().map(Into::into).collect()),
        }
    }
}

impl Rule for EnumRule {
    fn rule_name(&self) -> &str {
        "enum"
    }

    fn parameter_names(&self) -> &[&'static str] {
        &["enum"]
    }

    fn bound_params(&self) -> NamedParams {
        let mut params = NamedParams::new();
        if let Some(cases) = &self.cases {
            params.insert("enum".to_string(), Value::Array(cases.clone()));
        }
        params
    }

    fn validate(&self, _: &str, value: &Value, params: &NamedParams, _: &Value) -> Result<bool, ConfigError> {
        let cases = match &self.cases {
            Some(cases) => cases.clone(),
            None => param(params, "enum").map(param_list).unwrap_or_default(),
        };

        Ok(cases.iter().any(|case| case == value))
    }

    fn message(&self, _: &str, _: &NamedParams, _: &Value, _: &Value) -> String {
        "The :attribute must be a valid option.".to_string()
    }
}
