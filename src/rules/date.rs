//! Date rules (feature `date-rules`).
//!
//! Accepted inputs: RFC 3339 timestamps, `YYYY-MM-DD` with an optional
//! `HH:MM[:SS]` time, `YYYY/MM/DD`, UNIX timestamps (integers or digit
//! strings) and the words `now`, `today`, `tomorrow` and `yesterday`.
//! Everything is compared as UTC.

use super::{NamedParams, Rule, required_param};
use crate::error::ConfigError;
use crate::primitives::{has_path, resolve_value};
use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parses a value into a UTC date-time, or `None` when it is not a date.
pub fn parse_date(input: &Value) -> Option<NaiveDateTime> {
    match input {
        Value::Number(n) => from_timestamp(n.as_i64()?),
        Value::String(s) => parse_date_str(s.trim()),
        _ => None,
    }
}

fn from_timestamp(secs: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc())
}

fn parse_date_str(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }

    if s.bytes().all(|b| b.is_ascii_digit()) {
        return from_timestamp(s.parse().ok()?);
    }

    let today = Utc::now().date_naive();
    let midnight = |date: NaiveDate| date.and_hms_opt(0, 0, 0);
    match s.to_ascii_lowercase().as_str() {
        "now" => return Some(Utc::now().naive_utc()),
        "today" => return midnight(today),
        "tomorrow" => return today.checked_add_days(Days::new(1)).and_then(midnight),
        "yesterday" => return today.checked_sub_days(Days::new(1)).and_then(midnight),
        _ => {}
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(midnight)
        })
}

/// Resolves the `date` bound of `after`/`before`, following a field reference.
fn bound(rule: &str, params: &NamedParams, data: &Value) -> Result<Option<NaiveDateTime>, ConfigError> {
    let raw = required_param(params, rule, "date")?;

    let referenced = match raw {
        Value::String(name) if has_path(data, name) => resolve_value(data, name),
        _ => None,
    };

    match referenced {
        Some(other) => Ok(parse_date(other)),
        None => match parse_date(raw) {
            Some(date) => Ok(Some(date)),
            None => Err(ConfigError::invalid(
                rule,
                format!(
                    "date parameter must be a date (e.g. \"{}\", \"tomorrow\"), a UNIX timestamp, \
                     or the name of a field holding a date; got {}",
                    Utc::now().format("%Y-%m-%d"),
                    raw
                ),
            )),
        },
    }
}

// ─── date ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default)]
pub struct Date;

impl Rule for Date {
    fn rule_name(&self) -> &str {
        "date"
    }

    fn validate(&self, _: &str, value: &Value, _: &NamedParams, _: &Value) -> Result<bool, ConfigError> {
        Ok(parse_date(value).is_some())
    }

    fn message(&self, _: &str, _: &NamedParams, _: &Value, _: &Value) -> String {
        "The :attribute is not a valid date.".to_string()
    }
}

// ─── after / before ──────────────────────────────────────────────────────────

/// Strictly later than the bound: `after:2024-01-01`, `after:tomorrow`, `after:start_date`.
#[derive(Clone, Copy, Debug, Default)]
pub struct After;

impl Rule for After {
    fn rule_name(&self) -> &str {
        "after"
    }

    fn parameter_names(&self) -> &[&'static str] {
        &["date"]
    }

    fn validate(&self, _: &str, value: &Value, params: &NamedParams, data: &Value) -> Result<bool, ConfigError> {
        let Some(after) = bound("after", params, data)? else {
            return Ok(false);
        };
        Ok(parse_date(value).is_some_and(|date| date > after))
    }

    fn message(&self, _: &str, _: &NamedParams, _: &Value, _: &Value) -> String {
        "The :attribute must be a date after :date.".to_string()
    }
}

/// Strictly earlier than the bound.
#[derive(Clone, Copy, Debug, Default)]
pub struct Before;

impl Rule for Before {
    fn rule_name(&self) -> &str {
        "before"
    }

    fn parameter_names(&self) -> &[&'static str] {
        &["date"]
    }

    fn validate(&self, _: &str, value: &Value, params: &NamedParams, data: &Value) -> Result<bool, ConfigError> {
        let Some(before) = bound("before", params, data)? else {
            return Ok(false);
        };
        Ok(parse_date(value).is_some_and(|date| date < before))
    }

    fn message(&self, _: &str, _: &NamedParams, _: &Value, _: &Value) -> String {
        "The :attribute must be a date before :date.".to_string()
    }
}
