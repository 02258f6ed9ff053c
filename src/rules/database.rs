//! Rules backed by an external row lookup.
//!
//! The engine never creates a lookup. Whoever wires the registry attaches one,
//! typically through a factory:
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use fieldcheck::registry::RuleRegistry;
//! # use fieldcheck::rules::{Exists, RowLookup, Rule};
//! # fn wire(registry: &RuleRegistry, db: Arc<dyn RowLookup>) {
//! registry.register_factory("exists", move || {
//!     let rule: Arc<dyn Rule> = Arc::new(Exists::with_lookup(Arc::clone(&db)));
//!     Ok(rule)
//! });
//! # }
//! ```

use super::{NamedParams, Rule, param, required_param};
use crate::error::ConfigError;
use crate::primitives::display_value;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// "Does a matching row exist?" capability.
pub trait RowLookup: Send + Sync {
    /// True when `table` has a row whose `column` equals `value`, ignoring the
    /// row whose `id` equals `ignore_id` when one is given.
    fn row_exists(
        &self,
        table: &str,
        column: &str,
        value: &Value,
        ignore_id: Option<&Value>,
    ) -> Result<bool, String>;
}

fn lookup_error(rule: &str, message: String) -> ConfigError {
    ConfigError::invalid(rule, format!("row lookup failed: {}", message))
}

fn missing_lookup(rule: &str) -> ConfigError {
    ConfigError::MissingCapability {
        rule: rule.to_string(),
        capability: "database connection".to_string(),
    }
}

/// Table and column for a lookup; the column defaults to the field name.
fn target(rule: &str, field: &str, params: &NamedParams) -> Result<(String, String), ConfigError> {
    let table = display_value(required_param(params, rule, "table")?);
    let column = param(params, "column")
        .map(display_value)
        .unwrap_or_else(|| field.to_string());
    Ok((table, column))
}

// ─── exists ──────────────────────────────────────────────────────────────────

/// A row with the value must exist: `exists:users,email`.
#[derive(Clone, Default)]
pub struct Exists {
    lookup: Option<Arc<dyn RowLookup>>,
}

impl Exists {
    pub fn with_lookup(lookup: Arc<dyn RowLookup>) -> Self {
        Self { lookup: Some(lookup) }
    }

    pub fn set_lookup(&mut self, lookup: Arc<dyn RowLookup>) {
        self.lookup = Some(lookup);
    }
}

impl fmt::Debug for Exists {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exists")
            .field("lookup", &self.lookup.is_some())
            .finish()
    }
}

impl Rule for Exists {
    fn rule_name(&self) -> &str {
        "exists"
    }

    fn parameter_names(&self) -> &[&'static str] {
        &["table", "column"]
    }

    fn validate(&self, field: &str, value: &Value, params: &NamedParams, _: &Value) -> Result<bool, ConfigError> {
        let (table, column) = target("exists", field, params)?;
        let lookup = self.lookup.as_ref().ok_or_else(|| missing_lookup("exists"))?;

        lookup
            .row_exists(&table, &column, value, None)
            .map_err(|e| lookup_error("exists", e))
    }

    fn message(&self, _: &str, _: &NamedParams, _: &Value, _: &Value) -> String {
        "The selected :attribute is invalid.".to_string()
    }
}

// ─── unique ──────────────────────────────────────────────────────────────────

/// No row may hold the value: `unique:users,email,42` ignores the row with id 42.
#[derive(Clone, Default)]
pub struct Unique {
    lookup: Option<Arc<dyn RowLookup>>,
}

impl Unique {
    pub fn with_lookup(lookup: Arc<dyn RowLookup>) -> Self {
        Self { lookup: Some(lookup) }
    }

    pub fn set_lookup(&mut self, lookup: Arc<dyn RowLookup>) {
        self.lookup = Some(lookup);
    }
}

impl fmt::Debug for Unique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unique")
            .field("lookup", &self.lookup.is_some())
            .finish()
    }
}

impl Rule for Unique {
    fn rule_name(&self) -> &str {
        "unique"
    }

    fn parameter_names(&self) -> &[&'static str] {
        &["table", "column", "ignore_id"]
    }

    fn validate(&self, field: &str, value: &Value, params: &NamedParams, _: &Value) -> Result<bool, ConfigError> {
        let (table, column) = target("unique", field, params)?;
        let lookup = self.lookup.as_ref().ok_or_else(|| missing_lookup("unique"))?;

        lookup
            .row_exists(&table, &column, value, param(params, "ignore_id"))
            .map(|exists| !exists)
            .map_err(|e| lookup_error("unique", e))
    }

    fn message(&self, _: &str, _: &NamedParams, _: &Value, _: &Value) -> String {
        "The :attribute has already been taken.".to_string()
    }
}
