use crate::bag::ErrorBag;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A fault in how validation was configured, as opposed to a problem with the
/// input being validated.
///
/// Configuration errors abort the current run immediately and are never
/// recorded as field errors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A pipeline referenced a rule name nothing was registered under.
    #[error("validation rule '{name}' does not exist")]
    UnknownRule { name: String },

    /// A registered factory failed to produce a usable rule.
    #[error("rule '{name}' could not be instantiated: {reason}")]
    InvalidRuleType { name: String, reason: String },

    /// A rule was invoked without a parameter it cannot work without.
    #[error("{rule} rule requires a {parameter} parameter")]
    MissingParameter { rule: String, parameter: String },

    /// A parameter was supplied but is unusable (bad regex, bad date, ...).
    #[error("{rule} rule: {message}")]
    InvalidParameter { rule: String, message: String },

    /// A rule needs an external capability (e.g. a row lookup) that was never attached.
    #[error("{rule} rule requires a {capability}")]
    MissingCapability { rule: String, capability: String },

    /// A registration pointed at a rule type that cannot be resolved.
    #[error("cannot register rule '{name}': rule type '{target}' does not exist")]
    Registration { name: String, target: String },
}

impl ConfigError {
    pub(crate) fn missing(rule: &str, parameter: &str) -> Self {
        ConfigError::MissingParameter {
            rule: rule.to_string(),
            parameter: parameter.to_string(),
        }
    }

    pub(crate) fn invalid(rule: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidParameter {
            rule: rule.to_string(),
            message: message.into(),
        }
    }
}

/// Raised by `validated()` / `validate_or_fail()` when the input did not pass.
///
/// Carries the complete field → messages report.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{summary}")]
pub struct ValidationFailed {
    pub errors: ErrorBag,
    pub summary: String,
}

impl ValidationFailed {
    pub fn new(errors: ErrorBag) -> Self {
        let summary = summarize(&errors);
        Self { errors, summary }
    }

    /// First message for `field`, or the first message overall when `field` is `None`.
    pub fn first_error(&self, field: Option<&str>) -> Option<&str> {
        match field {
            Some(field) => self.errors.first(field),
            None => self
                .errors
                .iter()
                .find_map(|(_, messages)| messages.first().map(String::as_str)),
        }
    }
}

fn summarize(errors: &ErrorBag) -> String {
    let all = errors.all();
    let Some(first) = all.first() else {
        return "Validation failed.".to_string();
    };

    let others = all.len() - 1;
    match others {
        0 => first.to_string(),
        1 => format!("{} (and 1 other error)", first),
        n => format!("{} (and {} other errors)", first, n),
    }
}

/// Combined error type for the one-shot entry points.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Failed(#[from] ValidationFailed),
}

/// Error kind for rule-set document failures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseErrorKind {
    Syntax,
    TypeMismatch,
}

/// Produced when a YAML or JSON rule-set document cannot be loaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{} at {}", self.message, path),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ParseError {}
