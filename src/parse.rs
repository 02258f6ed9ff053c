//! Rule-token parsing and rule-set document loading.

use crate::error::{ParseError, ParseErrorKind};
use crate::types::{ParsedRule, RuleSet, RuleToken};
use regex::Regex;
use serde_json::{Number, Value};
use std::sync::LazyLock;

static FLOAT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").unwrap());

/// Name of the rule whose parameter is taken verbatim.
pub const REGEX_RULE: &str = "regex";

// ─── Rule tokens ─────────────────────────────────────────────────────────────

/// Splits a rule token into its name and positional parameters.
///
/// `"between:1,10"` → `("between", [1, 10])`. Parameters are trimmed and
/// coerced with [`coerce_parameter`], except for `regex`, whose whole
/// remainder after the first `:` is kept as one string. The rule name is not
/// checked against any registry here.
pub fn parse_rule(token: &str) -> ParsedRule {
    let Some((name, remainder)) = token.split_once(':') else {
        return ParsedRule {
            name: token.to_string(),
            params: Vec::new(),
        };
    };

    if name == REGEX_RULE {
        return ParsedRule {
            name: name.to_string(),
            params: vec![Value::String(remainder.to_string())],
        };
    }

    let params = remainder
        .split(',')
        .map(|piece| coerce_parameter(piece.trim()))
        .collect();

    ParsedRule {
        name: name.to_string(),
        params,
    }
}

/// Coerces one raw parameter: integers and floats become numbers,
/// `true`/`false`/`null` (any case) become literals, anything else stays a string.
pub fn coerce_parameter(raw: &str) -> Value {
    if let Ok(n) = raw.parse::<i64>() {
        return Value::Number(n.into());
    }

    if FLOAT_RE.is_match(raw)
        && let Ok(f) = raw.parse::<f64>()
        && let Some(n) = Number::from_f64(f)
    {
        return Value::Number(n);
    }

    match raw.to_ascii_lowercase().as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => Value::String(raw.to_string()),
    }
}

/// Splits a pipe-delimited pipeline into its tokens.
///
/// Surrounding whitespace is trimmed and empty segments are dropped, so
/// `"required| string||max:5"` yields `["required", "string", "max:5"]`.
pub fn split_pipeline(pipeline: &str) -> Vec<String> {
    pipeline
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Names of every rule in a pipeline, modifiers included, in order.
pub fn rule_names(tokens: &[RuleToken]) -> Vec<String> {
    tokens.iter().map(|t| t.name().to_string()).collect()
}

// ─── Rule-set documents ──────────────────────────────────────────────────────

const RULE_SET_KEYS: &[&str] = &["rules", "messages", "attributes", "stop_on_first_failure"];

impl RuleSet {
    /// Loads a rule set from a YAML document.
    pub fn from_yaml(input: &str) -> Result<RuleSet, ParseError> {
        if input.trim().is_empty() {
            return Err(syntax_error("empty input"));
        }

        let value: Value =
            serde_saphyr::from_str(input).map_err(|e| syntax_error(&e.to_string()))?;
        rule_set_from_value(value)
    }

    /// Loads a rule set from a JSON document. Key order is preserved.
    pub fn from_json(input: &str) -> Result<RuleSet, ParseError> {
        if input.trim().is_empty() {
            return Err(syntax_error("empty input"));
        }

        let value: Value = serde_json::from_str(input).map_err(|e| syntax_error(&e.to_string()))?;
        rule_set_from_value(value)
    }
}

fn rule_set_from_value(value: Value) -> Result<RuleSet, ParseError> {
    let Some(obj) = value.as_object() else {
        return Err(ParseError {
            kind: ParseErrorKind::TypeMismatch,
            message: "rule set root must be a mapping".to_string(),
            path: None,
        });
    };

    if let Some(unknown) = obj.keys().find(|k| !RULE_SET_KEYS.contains(&k.as_str())) {
        return Err(ParseError {
            kind: ParseErrorKind::TypeMismatch,
            message: format!("unknown top-level field: {}", unknown),
            path: Some(unknown.clone()),
        });
    }

    serde_json::from_value(value).map_err(|e| ParseError {
        kind: ParseErrorKind::TypeMismatch,
        message: e.to_string(),
        path: None,
    })
}

fn syntax_error(message: &str) -> ParseError {
    ParseError {
        kind: ParseErrorKind::Syntax,
        message: message.to_string(),
        path: None,
    }
}
