//! Size-aware rules.
//!
//! Strings are measured in characters, sequences and mappings in items and
//! numbers by value. A string that reads as a number is measured by value only
//! when the field's pipeline also carries `numeric` or `integer`.

use super::{NamedParams, Rule, has_numeric_rule, numeric_param};
use crate::error::ConfigError;
use crate::primitives::numeric_value;
use serde_json::{Value, json};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Measure {
    Characters,
    Items,
    Number,
}

/// The quantity a size rule compares, and what it counts.
fn measure(value: &Value, data: &Value) -> Option<(f64, Measure)> {
    if has_numeric_rule(data)
        && let Some(n) = numeric_value(value)
    {
        return Some((n, Measure::Number));
    }

    match value {
        Value::String(s) => Some((s.chars().count() as f64, Measure::Characters)),
        Value::Number(n) => n.as_f64().map(|n| (n, Measure::Number)),
        Value::Array(items) => Some((items.len() as f64, Measure::Items)),
        Value::Object(map) => Some((map.len() as f64, Measure::Items)),
        _ => None,
    }
}

/// Counted quantities compare against the truncated bound.
fn bound_for(bound: f64, kind: Measure) -> f64 {
    match kind {
        Measure::Number => bound,
        Measure::Characters | Measure::Items => bound.trunc(),
    }
}

// ─── min ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default)]
pub struct Min {
    min: Option<f64>,
}

impl Min {
    pub fn new(min: f64) -> Self {
        Self { min: Some(min) }
    }
}

impl Rule for Min {
    fn rule_name(&self) -> &str {
        "min"
    }

    fn parameter_names(&self) -> &[&'static str] {
        &["min"]
    }

    fn bound_params(&self) -> NamedParams {
        bound("min", self.min)
    }

    fn validate(&self, _: &str, value: &Value, params: &NamedParams, data: &Value) -> Result<bool, ConfigError> {
        let min = match self.min {
            Some(min) => min,
            None => numeric_param(params, "min", "min")?,
        };

        Ok(measure(value, data).is_some_and(|(size, kind)| size >= bound_for(min, kind)))
    }

    fn message(&self, _: &str, _: &NamedParams, value: &Value, data: &Value) -> String {
        match measure(value, data).map(|(_, kind)| kind) {
            Some(Measure::Characters) => "The :attribute must be at least :min characters.",
            Some(Measure::Items) => "The :attribute must have at least :min items.",
            _ => "The :attribute must be at least :min.",
        }
        .to_string()
    }
}

// ─── max ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default)]
pub struct Max {
    max: Option<f64>,
}

impl Max {
    pub fn new(max: f64) -> Self {
        Self { max: Some(max) }
    }
}

impl Rule for Max {
    fn rule_name(&self) -> &str {
        "max"
    }

    fn parameter_names(&self) -> &[&'static str] {
        &["max"]
    }

    fn bound_params(&self) -> NamedParams {
        bound("max", self.max)
    }

    fn validate(&self, _: &str, value: &Value, params: &NamedParams, data: &Value) -> Result<bool, ConfigError> {
        let max = match self.max {
            Some(max) => max,
            None => numeric_param(params, "max", "max")?,
        };

        Ok(measure(value, data).is_some_and(|(size, kind)| size <= bound_for(max, kind)))
    }

    fn message(&self, _: &str, _: &NamedParams, value: &Value, data: &Value) -> String {
        match measure(value, data).map(|(_, kind)| kind) {
            Some(Measure::Characters) => "The :attribute may not be greater than :max characters.",
            Some(Measure::Items) => "The :attribute may not have more than :max items.",
            _ => "The :attribute may not be greater than :max.",
        }
        .to_string()
    }
}

fn bound(name: &str, value: Option<f64>) -> NamedParams {
    let mut params = NamedParams::new();
    if let Some(v) = value {
        params.insert(name.to_string(), json!(v));
    }
    params
}

// ─── between ─────────────────────────────────────────────────────────────────

/// Numbers (including numeric strings) by value, other strings by length,
/// collections by count.
#[derive(Clone, Copy, Debug, Default)]
pub struct Between;

impl Rule for Between {
    fn rule_name(&self) -> &str {
        "between"
    }

    fn parameter_names(&self) -> &[&'static str] {
        &["min", "max"]
    }

    fn validate(&self, _: &str, value: &Value, params: &NamedParams, _: &Value) -> Result<bool, ConfigError> {
        let min = numeric_param(params, "between", "min")?;
        let max = numeric_param(params, "between", "max")?;

        let size = match value {
            Value::String(s) => numeric_value(value).unwrap_or(s.chars().count() as f64),
            Value::Number(n) => match n.as_f64() {
                Some(n) => n,
                None => return Ok(false),
            },
            Value::Array(items) => items.len() as f64,
            Value::Object(map) => map.len() as f64,
            _ => return Ok(false),
        };

        Ok(size >= min && size <= max)
    }

    fn message(&self, _: &str, _: &NamedParams, _: &Value, _: &Value) -> String {
        "The :attribute must be between :min and :max.".to_string()
    }
}

// ─── size ────────────────────────────────────────────────────────────────────

/// Exact size: numbers by value, strings by length, collections by count.
#[derive(Clone, Copy, Debug, Default)]
pub struct Size;

impl Rule for Size {
    fn rule_name(&self) -> &str {
        "size"
    }

    fn parameter_names(&self) -> &[&'static str] {
        &["size"]
    }

    fn validate(&self, _: &str, value: &Value, params: &NamedParams, _: &Value) -> Result<bool, ConfigError> {
        let expected = numeric_param(params, "size", "size")?;

        let actual = match value {
            Value::String(s) => numeric_value(value).unwrap_or(s.chars().count() as f64),
            Value::Number(n) => match n.as_f64() {
                Some(n) => n,
                None => return Ok(false),
            },
            Value::Array(items) => items.len() as f64,
            Value::Object(map) => map.len() as f64,
            _ => return Ok(false),
        };

        Ok(actual == expected)
    }

    fn message(&self, _: &str, _: &NamedParams, _: &Value, _: &Value) -> String {
        "The :attribute must be exactly :size.".to_string()
    }
}
