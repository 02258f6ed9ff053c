//! The rule contract and the built-in rule catalog.
//!
//! Every predicate implements [`Rule`]. Rules are stateless across calls: one
//! instance may be cached and reused for every field of a run.

use crate::error::ConfigError;
use serde_json::{Map, Value};
use std::sync::Arc;

pub mod compare;
pub mod database;
#[cfg(feature = "date-rules")]
pub mod date;
pub mod format;
pub mod presence;
pub mod size;

pub use compare::{Different, EnumRule, In, Same};
pub use database::{Exists, RowLookup, Unique};
#[cfg(feature = "date-rules")]
pub use date::{After, Before, Date};
pub use format::{
    Alpha, AlphaNum, ArrayRule, Boolean, Email, Integer, IpAddress, Json, Numeric, RegexRule,
    StringRule, Url,
};
pub use presence::{Confirmed, Filled, Nullable, Present, Required, Sometimes};
pub use size::{Between, Max, Min, Size};

/// Parameters bound to a rule's declared parameter names.
pub type NamedParams = Map<String, Value>;

/// Key under which the names of a field's whole pipeline are added to the data
/// handed to string-token rules.
pub const FIELD_RULES_KEY: &str = "_field_rules";

/// A single validation predicate.
pub trait Rule: Send + Sync {
    /// Stable registry key, e.g. `"between"`.
    fn rule_name(&self) -> &str;

    /// Declared parameter names, in positional order.
    fn parameter_names(&self) -> &[&'static str] {
        &[]
    }

    /// Parameters carried by a pre-built instance, used in place of parsed
    /// token parameters.
    fn bound_params(&self) -> NamedParams {
        NamedParams::new()
    }

    /// Checks `value` (the value at `field`) against the rule.
    ///
    /// `data` is the full input, possibly carrying [`FIELD_RULES_KEY`].
    /// Returns `Err` only for configuration faults, never for invalid input.
    fn validate(
        &self,
        field: &str,
        value: &Value,
        params: &NamedParams,
        data: &Value,
    ) -> Result<bool, ConfigError>;

    /// Message template with `:attribute` and `:param` placeholders.
    ///
    /// Receives the same value and data as [`Rule::validate`] so templates can
    /// depend on what was measured.
    fn message(&self, field: &str, params: &NamedParams, value: &Value, data: &Value) -> String;

    /// Identity recorded in the failed-rule list for pre-built instances.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A zero-argument constructor for a rule type.
pub type RuleConstructor = fn() -> Arc<dyn Rule>;

fn entry(name: &'static str, constructor: RuleConstructor) -> (&'static str, RuleConstructor) {
    (name, constructor)
}

pub(crate) fn construct<R: Rule + Default + 'static>() -> Arc<dyn Rule> {
    Arc::new(R::default())
}

/// Every built-in rule, keyed by its own `rule_name()`.
pub fn builtin_rules() -> Vec<(&'static str, RuleConstructor)> {
    let mut catalog: Vec<(&'static str, RuleConstructor)> = vec![
        entry("required", construct::<Required>),
        entry("filled", construct::<Filled>),
        entry("present", construct::<Present>),
        entry("nullable", construct::<Nullable>),
        entry("sometimes", construct::<Sometimes>),
        entry("confirmed", construct::<Confirmed>),
        entry("min", construct::<Min>),
        entry("max", construct::<Max>),
        entry("between", construct::<Between>),
        entry("size", construct::<Size>),
        entry("numeric", construct::<Numeric>),
        entry("integer", construct::<Integer>),
        entry("boolean", construct::<Boolean>),
        entry("string", construct::<StringRule>),
        entry("array", construct::<ArrayRule>),
        entry("alpha", construct::<Alpha>),
        entry("alpha_num", construct::<AlphaNum>),
        entry("json", construct::<Json>),
        entry("url", construct::<Url>),
        entry("email", construct::<Email>),
        entry("ip_address", construct::<IpAddress>),
        entry("regex", construct::<RegexRule>),
        entry("same", construct::<Same>),
        entry("different", construct::<Different>),
        entry("in", construct::<In>),
        entry("enum", construct::<EnumRule>),
        entry("exists", construct::<Exists>),
        entry("unique", construct::<Unique>),
    ];

    #[cfg(feature = "date-rules")]
    catalog.extend([
        entry("date", construct::<Date>),
        entry("after", construct::<After>),
        entry("before", construct::<Before>),
    ]);

    catalog
}

// ─── Parameter helpers ───────────────────────────────────────────────────────

/// A named parameter, treating an explicit null as absent.
pub(crate) fn param<'a>(params: &'a NamedParams, name: &str) -> Option<&'a Value> {
    params.get(name).filter(|v| !v.is_null())
}

/// A named parameter that must be present.
pub(crate) fn required_param<'a>(
    params: &'a NamedParams,
    rule: &str,
    name: &str,
) -> Result<&'a Value, ConfigError> {
    param(params, name).ok_or_else(|| ConfigError::missing(rule, name))
}

/// A named parameter that must be present and numeric.
pub(crate) fn numeric_param(params: &NamedParams, rule: &str, name: &str) -> Result<f64, ConfigError> {
    let raw = required_param(params, rule, name)?;
    crate::primitives::numeric_value(raw)
        .ok_or_else(|| ConfigError::invalid(rule, format!("{} must be numeric, got {}", name, raw)))
}

/// Rule names of the field's pipeline, if the data carries them.
pub(crate) fn field_rules(data: &Value) -> impl Iterator<Item = &str> {
    data.get(FIELD_RULES_KEY)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
}

/// True when a sibling `numeric` or `integer` rule asks for value comparison.
pub(crate) fn has_numeric_rule(data: &Value) -> bool {
    field_rules(data).any(|name| name == "numeric" || name == "integer")
}

/// Scalar list view of a parameter: arrays as-is, a lone scalar as one element.
pub(crate) fn param_list(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::String(s) if s.contains(',') => s
            .split(',')
            .map(|piece| Value::String(piece.trim().to_string()))
            .collect(),
        Value::Null => Vec::new(),
        other => vec![other.clone()],
    }
}
