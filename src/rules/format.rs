//! Type and format predicates.

use super::{NamedParams, Rule, param, required_param};
use crate::error::ConfigError;
use crate::primitives::{display_value, numeric_value};
use regex::Regex;
use serde_json::Value;
use std::net::IpAddr;
use std::sync::LazyLock;

static INTEGER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[+-]?(0|[1-9][0-9]*)$").unwrap());

static ALPHA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z]+$").unwrap());

static ALPHA_NUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$").unwrap());

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

#[cfg(not(feature = "url-rule"))]
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://[^\s/?#]+[^\s]*$").unwrap());

/// Regex delimiters accepted around a pattern (`/^a+$/i`).
static DELIMITED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([/#~])(?s)(.*)([/#~])([imsxuU]*)$").unwrap());

macro_rules! simple_rule {
    ($(#[$doc:meta])* $name:ident, $key:literal, $message:literal, |$value:ident| $check:expr) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $name;

        impl Rule for $name {
            fn rule_name(&self) -> &str {
                $key
            }

            fn validate(&self, _: &str, $value: &Value, _: &NamedParams, _: &Value) -> Result<bool, ConfigError> {
                Ok($check)
            }

            fn message(&self, _: &str, _: &NamedParams, _: &Value, _: &Value) -> String {
                $message.to_string()
            }
        }
    };
}

simple_rule!(
    /// Numbers, and strings that read as numbers.
    Numeric, "numeric", "The :attribute must be a number.",
    |value| numeric_value(value).is_some()
);

simple_rule!(
    /// Whole numbers, and strings written as one (no leading zeros).
    Integer, "integer", "The :attribute must be an integer.",
    |value| match value {
        Value::Number(n) => n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0),
        Value::String(s) => INTEGER_RE.is_match(s.trim()),
        _ => false,
    }
);

simple_rule!(
    /// `true`, `false`, `0`, `1`, `"0"` or `"1"`.
    Boolean, "boolean", "The :attribute field must be true or false.",
    |value| match value {
        Value::Bool(_) => true,
        Value::Number(n) => n.as_i64().is_some_and(|i| i == 0 || i == 1),
        Value::String(s) => s == "0" || s == "1",
        _ => false,
    }
);

simple_rule!(
    StringRule, "string", "The :attribute must be a string.",
    |value| value.is_string()
);

simple_rule!(
    /// Sequences and mappings.
    ArrayRule, "array", "The :attribute must be an array.",
    |value| value.is_array() || value.is_object()
);

simple_rule!(
    Alpha, "alpha", "The :attribute may only contain letters.",
    |value| value.as_str().is_some_and(|s| ALPHA_RE.is_match(s))
);

simple_rule!(
    AlphaNum, "alpha_num", "The :attribute may only contain letters and numbers.",
    |value| value.as_str().is_some_and(|s| ALPHA_NUM_RE.is_match(s))
);

simple_rule!(
    /// A string holding a well-formed JSON document.
    Json, "json", "The :attribute must be a valid JSON string.",
    |value| value.as_str().is_some_and(|s| serde_json::from_str::<Value>(s).is_ok())
);

simple_rule!(
    Email, "email", "The :attribute must be a valid email address.",
    |value| value.as_str().is_some_and(|s| EMAIL_RE.is_match(s))
);

simple_rule!(
    /// An absolute URL.
    Url, "url", "The :attribute must be a valid URL.",
    |value| value.as_str().is_some_and(is_url)
);

#[cfg(feature = "url-rule")]
fn is_url(s: &str) -> bool {
    url::Url::parse(s).is_ok_and(|u| !u.cannot_be_a_base() || u.scheme() == "mailto")
}

#[cfg(not(feature = "url-rule"))]
fn is_url(s: &str) -> bool {
    URL_RE.is_match(s)
}

// ─── ip_address ──────────────────────────────────────────────────────────────

/// IPv4 or IPv6 address; `ip_address:4` / `ip_address:6` restrict the family.
#[derive(Clone, Copy, Debug, Default)]
pub struct IpAddress;

impl Rule for IpAddress {
    fn rule_name(&self) -> &str {
        "ip_address"
    }

    fn parameter_names(&self) -> &[&'static str] {
        &["version"]
    }

    fn validate(&self, _: &str, value: &Value, params: &NamedParams, _: &Value) -> Result<bool, ConfigError> {
        let Some(addr) = value.as_str().and_then(|s| s.parse::<IpAddr>().ok()) else {
            return Ok(false);
        };

        Ok(match version(params).as_deref() {
            Some("4") => addr.is_ipv4(),
            Some("6") => addr.is_ipv6(),
            _ => true,
        })
    }

    fn message(&self, _: &str, params: &NamedParams, _: &Value, _: &Value) -> String {
        match version(params).as_deref() {
            Some("4") => "The :attribute must be a valid IPv4 address.",
            Some("6") => "The :attribute must be a valid IPv6 address.",
            _ => "The :attribute must be a valid IP address.",
        }
        .to_string()
    }
}

fn version(params: &NamedParams) -> Option<String> {
    param(params, "version").map(display_value)
}

// ─── regex ───────────────────────────────────────────────────────────────────

/// Matches strings and numbers against a pattern.
///
/// The pattern may be bare (`^[a-z]+$`) or wrapped in `/`, `#` or `~`
/// delimiters with trailing flags (`/^[a-z]+$/i`).
#[derive(Clone, Copy, Debug, Default)]
pub struct RegexRule;

impl Rule for RegexRule {
    fn rule_name(&self) -> &str {
        "regex"
    }

    fn parameter_names(&self) -> &[&'static str] {
        &["pattern"]
    }

    fn validate(&self, _: &str, value: &Value, params: &NamedParams, _: &Value) -> Result<bool, ConfigError> {
        let subject = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return Ok(false),
        };

        let pattern = display_value(required_param(params, "regex", "pattern")?);
        let re = compile(&pattern)?;
        Ok(re.is_match(&subject))
    }

    fn message(&self, _: &str, _: &NamedParams, _: &Value, _: &Value) -> String {
        "The :attribute format is invalid.".to_string()
    }
}

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    let source = match DELIMITED_RE.captures(pattern) {
        Some(caps) if caps[1] == caps[3] => {
            let flags: String = caps[4].chars().filter(|c| *c != 'u').collect();
            if flags.is_empty() {
                caps[2].to_string()
            } else {
                format!("(?{}){}", flags, &caps[2])
            }
        }
        _ => pattern.to_string(),
    };

    Regex::new(&source).map_err(|e| ConfigError::invalid("regex", format!("invalid pattern '{}': {}", pattern, e)))
}
