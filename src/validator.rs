//! The validation engine.
//!
//! A [`Validator`] owns one input and one rule spec and runs at most once:
//! `validate()` expands every field pattern against the input, runs each
//! concrete field's pipeline left to right, and records messages, failed rule
//! names and the projection of visited fields. Later calls return the
//! memoized outcome, so rules with side effects (row lookups) run once.

use crate::bag::ErrorBag;
use crate::error::{ConfigError, Error, ValidationFailed};
use crate::parse::{parse_rule, rule_names};
use crate::primitives::{
    WILDCARD, display_value, expand_pattern, friendly_attribute, has_path, is_empty_value,
    resolve_value, set_path,
};
use crate::registry::{ResolvedRules, RuleRegistry};
use crate::rules::{FIELD_RULES_KEY, NamedParams, Rule};
use crate::types::{RuleSet, RuleSpec, RuleToken};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

pub const BAIL: &str = "bail";
pub const NULLABLE: &str = "nullable";
pub const SOMETIMES: &str = "sometimes";
pub const PRESENT: &str = "present";

/// Control-flow flags; recognized by name and never dispatched as rules.
pub const MODIFIERS: &[&str] = &[BAIL, SOMETIMES, PRESENT, NULLABLE];

/// Rules that still run when the value is empty.
pub const EMPTY_EXEMPT: &[&str] = &["required", "filled", "confirmed", PRESENT, NULLABLE];

/// Runs after validation with the finished validator; may add errors.
pub type AfterCallback = Box<dyn FnMut(&mut Validator)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    NotRun,
    Running,
    Done,
}

pub struct Validator {
    registry: Arc<RuleRegistry>,
    data: Value,
    rules: RuleSpec,
    custom_messages: HashMap<String, String>,
    custom_attributes: HashMap<String, String>,
    stop_on_first_failure: bool,
    after_callbacks: Vec<AfterCallback>,
    resolved: ResolvedRules,
    errors: ErrorBag,
    validated_data: Value,
    failed_rules: HashMap<String, Vec<String>>,
    state: RunState,
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("rules", &self.rules)
            .field("stop_on_first_failure", &self.stop_on_first_failure)
            .field("state", &self.state)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

impl Validator {
    /// A validator resolving rules through the process-wide registry.
    pub fn new(data: Value, rules: RuleSpec) -> Self {
        Self::with_registry(RuleRegistry::global(), data, rules)
    }

    pub fn with_registry(registry: Arc<RuleRegistry>, data: Value, rules: RuleSpec) -> Self {
        Self {
            registry,
            data,
            rules,
            custom_messages: HashMap::new(),
            custom_attributes: HashMap::new(),
            stop_on_first_failure: false,
            after_callbacks: Vec::new(),
            resolved: ResolvedRules::new(),
            errors: ErrorBag::new(),
            validated_data: Value::Object(Map::new()),
            failed_rules: HashMap::new(),
            state: RunState::NotRun,
        }
    }

    /// A validator configured from a loaded [`RuleSet`].
    pub fn from_rule_set(registry: Arc<RuleRegistry>, data: Value, rule_set: RuleSet) -> Self {
        let mut validator = Self::with_registry(registry, data, rule_set.rules);
        validator
            .messages(rule_set.messages)
            .attributes(rule_set.attributes)
            .stop_on_first_failure(rule_set.stop_on_first_failure);
        validator
    }

    // ─── Configuration ───────────────────────────────────────────────────────

    /// Adds custom messages keyed by `rule`, `field.rule` or `pattern.rule`.
    pub fn messages<I, K, V>(&mut self, messages: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.custom_messages
            .extend(messages.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Adds friendly names for fields or patterns.
    pub fn attributes<I, K, V>(&mut self, attributes: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.custom_attributes
            .extend(attributes.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Abort the whole run after the first field that records an error.
    pub fn stop_on_first_failure(&mut self, stop: bool) -> &mut Self {
        self.stop_on_first_failure = stop;
        self
    }

    pub fn after<F>(&mut self, callback: F) -> &mut Self
    where
        F: FnMut(&mut Validator) + 'static,
    {
        self.after_callbacks.push(Box::new(callback));
        self
    }

    // ─── Accessors ───────────────────────────────────────────────────────────

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// The error report, for after-callbacks that add their own errors.
    pub fn errors_mut(&mut self) -> &mut ErrorBag {
        &mut self.errors
    }

    // ─── Running ─────────────────────────────────────────────────────────────

    /// Runs validation once and returns whether the input passed.
    ///
    /// A configuration error aborts the run and leaves it re-runnable.
    pub fn validate(&mut self) -> Result<bool, ConfigError> {
        if self.state == RunState::Done {
            return Ok(!self.errors.any());
        }

        self.errors.clear();
        self.validated_data = Value::Object(Map::new());
        self.failed_rules.clear();
        self.state = RunState::Running;
        debug!(patterns = self.rules.len(), "validation started");

        if let Err(e) = self.run() {
            self.state = RunState::NotRun;
            return Err(e);
        }

        self.state = RunState::Done;

        let mut callbacks = std::mem::take(&mut self.after_callbacks);
        for callback in callbacks.iter_mut() {
            callback(self);
        }
        callbacks.append(&mut self.after_callbacks);
        self.after_callbacks = callbacks;

        let passed = !self.errors.any();
        debug!(passed, errors = self.errors.count(), "validation finished");
        Ok(passed)
    }

    fn run(&mut self) -> Result<(), ConfigError> {
        let rules = self.rules.clone();
        // One copy of the input per run; only its field-rules entry changes per pattern.
        let mut context = self.data.clone();

        for (pattern, pipeline) in rules.iter() {
            let mut targets = expand_pattern(pattern, &self.data);
            if targets.is_empty() && !pattern.contains(WILDCARD) {
                targets.push(pattern.to_string());
            }
            trace!(pattern, targets = targets.len(), "expanded field pattern");

            let tokens = pipeline.tokens();
            set_field_rules(&mut context, &tokens);
            for field in &targets {
                self.validate_field(field, &tokens, pattern, &context)?;

                if self.stop_on_first_failure && self.errors.any() {
                    debug!(field = %field, "stopping on first failure");
                    return Ok(());
                }
            }
        }

        Ok(())
    }

    fn validate_field(
        &mut self,
        field: &str,
        tokens: &[RuleToken],
        pattern: &str,
        context: &Value,
    ) -> Result<(), ConfigError> {
        let value = resolve_value(&self.data, field).cloned().unwrap_or(Value::Null);
        let exists = has_path(&self.data, field);
        let has = |modifier: &str| tokens.iter().any(|t| t.is_modifier(modifier));
        let bail = has(BAIL);
        let nullable = has(NULLABLE);

        if has(SOMETIMES) && !exists {
            trace!(field, "absent field with sometimes, skipped");
            return Ok(());
        }

        if has(PRESENT) && !exists {
            let rule = self.resolved.resolve(&self.registry, PRESENT)?;
            let template = match self.custom_message(field, PRESENT, pattern) {
                Some(custom) => custom.clone(),
                None => rule.message(field, &NamedParams::new(), &value, &self.data),
            };
            let message = self.replace_parameters(&template, field, &NamedParams::new(), pattern);
            self.record(field, PRESENT.to_string(), message);

            if bail {
                return Ok(());
            }
        }

        if exists {
            set_path(&mut self.validated_data, &self.data, field, value.clone());
        }

        for token in tokens {
            if MODIFIERS.iter().any(|m| token.is_modifier(m)) {
                continue;
            }

            if nullable && value.is_null() {
                continue;
            }

            let before = self.errors.count();
            match token {
                RuleToken::Token(raw) => self.apply_token(field, &value, raw, pattern, context)?,
                RuleToken::Rule(rule) => self.apply_instance(field, &value, rule, pattern, context)?,
            }

            if bail && self.errors.count() > before {
                break;
            }
        }

        Ok(())
    }

    /// Runs one string token: callback, empty-value skip, or registry rule.
    fn apply_token(
        &mut self,
        field: &str,
        value: &Value,
        raw: &str,
        pattern: &str,
        context: &Value,
    ) -> Result<(), ConfigError> {
        let parsed = parse_rule(raw);
        let name = parsed.name.as_str();

        if let Some(callback) = self.registry.callback(name) {
            let named = self.callback_params(name, &parsed.params)?;
            if !callback(field, value, &named, &self.data) {
                let template = match self.custom_message(field, name, pattern) {
                    Some(custom) => custom.clone(),
                    None => format!("The :attribute field failed the {} validation.", name),
                };
                let message = self.replace_parameters(&template, field, &named, pattern);
                self.record(field, name.to_string(), message);
            }
            return Ok(());
        }

        if is_empty_value(value) && !EMPTY_EXEMPT.contains(&name) {
            trace!(field, rule = name, "empty value, rule skipped");
            return Ok(());
        }

        let rule = self.resolved.resolve(&self.registry, name)?;
        let named = bind_parameters(rule.parameter_names(), &parsed.params);

        if !rule.validate(field, value, &named, context)? {
            let template = match self.custom_message(field, name, pattern) {
                Some(custom) => custom.clone(),
                None => rule.message(field, &named, value, context),
            };
            let message = self.replace_parameters(&template, field, &named, pattern);
            self.record(field, name.to_string(), message);
        }

        Ok(())
    }

    /// Runs a pre-built rule with the parameters it carries.
    fn apply_instance(
        &mut self,
        field: &str,
        value: &Value,
        rule: &Arc<dyn Rule>,
        pattern: &str,
        context: &Value,
    ) -> Result<(), ConfigError> {
        let name = rule.rule_name();

        if is_empty_value(value) && !EMPTY_EXEMPT.contains(&name) {
            trace!(field, rule = name, "empty value, rule skipped");
            return Ok(());
        }

        let named = rule.bound_params();
        if !rule.validate(field, value, &named, context)? {
            let template = match self.custom_message(field, name, pattern) {
                Some(custom) => custom.clone(),
                None => rule.message(field, &named, value, context),
            };
            let message = self.replace_parameters(&template, field, &named, pattern);
            self.record(field, rule.type_name().to_string(), message);
        }

        Ok(())
    }

    fn record(&mut self, field: &str, rule: String, message: String) {
        debug!(field, rule = %rule, "field failed");
        self.errors.add(field, message);
        self.failed_rules.entry(field.to_string()).or_default().push(rule);
    }

    /// Callback parameters bind through a same-named rule when one is
    /// registered, otherwise by position ("0", "1", ...).
    fn callback_params(&mut self, name: &str, positional: &[Value]) -> Result<NamedParams, ConfigError> {
        if self.registry.contains(name) {
            let rule = self.resolved.resolve(&self.registry, name)?;
            return Ok(bind_parameters(rule.parameter_names(), positional));
        }

        Ok(positional
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v.clone()))
            .collect())
    }

    // ─── Messages ────────────────────────────────────────────────────────────

    /// Looks up `pattern.rule` (for expanded fields), then `field.rule`, then `rule`.
    fn custom_message(&self, field: &str, rule: &str, pattern: &str) -> Option<&String> {
        if pattern != field
            && let Some(message) = self.custom_messages.get(&format!("{}.{}", pattern, rule))
        {
            return Some(message);
        }

        self.custom_messages
            .get(&format!("{}.{}", field, rule))
            .or_else(|| self.custom_messages.get(rule))
    }

    /// Substitutes `:attribute` and every `:param` placeholder.
    fn replace_parameters(&self, template: &str, field: &str, params: &NamedParams, pattern: &str) -> String {
        let mut message = template.replace(":attribute", &self.attribute_name(field, Some(pattern)));

        // Longest names first so `:min` never eats the front of `:min_width`.
        let mut names: Vec<&String> = params.keys().collect();
        names.sort_by_key(|name| std::cmp::Reverse(name.len()));

        for name in names {
            let value = &params[name.as_str()];
            let text = match value {
                Value::String(s) if self.is_field_reference(s) => self.attribute_name(s, None),
                other => display_value(other),
            };
            message = message.replace(&format!(":{}", name), &text);
        }

        message
    }

    fn is_field_reference(&self, value: &str) -> bool {
        self.custom_attributes.contains_key(value)
            || self.data.get(value).is_some()
            || value.contains('.')
    }

    fn attribute_name(&self, field: &str, pattern: Option<&str>) -> String {
        if let Some(name) = self.custom_attributes.get(field) {
            return name.clone();
        }

        if let Some(pattern) = pattern
            && let Some(name) = self.custom_attributes.get(pattern)
        {
            return name.clone();
        }

        friendly_attribute(field)
    }

    // ─── Results ─────────────────────────────────────────────────────────────

    pub fn passes(&mut self) -> Result<bool, ConfigError> {
        self.validate()
    }

    pub fn fails(&mut self) -> Result<bool, ConfigError> {
        self.validate().map(|passed| !passed)
    }

    pub fn errors(&mut self) -> Result<&ErrorBag, ConfigError> {
        self.validate()?;
        Ok(&self.errors)
    }

    /// Field → messages.
    pub fn get_errors(&mut self) -> Result<Map<String, Value>, ConfigError> {
        self.validate()?;
        Ok(self.errors.to_map())
    }

    /// Field → names of the rules that failed on it, in run order.
    ///
    /// String-token rules are listed by name, pre-built rules by type name.
    pub fn failed(&mut self) -> Result<&HashMap<String, Vec<String>>, ConfigError> {
        self.validate()?;
        Ok(&self.failed_rules)
    }

    pub fn first(&mut self, field: &str) -> Result<Option<&str>, ConfigError> {
        self.validate()?;
        Ok(self.errors.first(field))
    }

    /// The projection of validated fields, or [`Error::Failed`] with the full report.
    ///
    /// The projection keeps the source's shape. Where the input holds a
    /// sequence, the projection holds one too, so indices below a visited one
    /// that were never visited themselves come back as `null`: validating only
    /// `items.1` of `["a", "b"]` yields `{"items": [null, "b"]}`.
    pub fn validated(&mut self) -> Result<Map<String, Value>, Error> {
        if !self.validate()? {
            return Err(ValidationFailed::new(self.errors.clone()).into());
        }
        Ok(self.projection())
    }

    pub fn validate_or_fail(&mut self) -> Result<Map<String, Value>, Error> {
        self.validated()
    }

    /// Whatever projection was collected, pass or fail. Never errors; a
    /// configuration error is logged and the partial projection returned.
    /// Shaped like the projection of [`Validator::validated`].
    pub fn safe(&mut self) -> Map<String, Value> {
        if let Err(e) = self.validate() {
            warn!(error = %e, "validation aborted, returning partial data");
        }
        self.projection()
    }

    fn projection(&self) -> Map<String, Value> {
        match &self.validated_data {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        }
    }
}

/// Binds positional parameters to declared names.
///
/// A rule declaring exactly one name receives every positional value in that
/// slot: the value itself when there is at most one, the whole list otherwise.
/// With several names each takes its position, missing ones null.
pub fn bind_parameters(names: &[&str], positional: &[Value]) -> NamedParams {
    if let [name] = names {
        let value = match positional {
            [] => Value::Null,
            [single] => single.clone(),
            many => Value::Array(many.to_vec()),
        };
        let mut named = NamedParams::new();
        named.insert(name.to_string(), value);
        return named;
    }

    names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.to_string(), positional.get(i).cloned().unwrap_or(Value::Null)))
        .collect()
}

/// Stores the names of a pipeline under [`FIELD_RULES_KEY`] in the rule context.
fn set_field_rules(context: &mut Value, tokens: &[RuleToken]) {
    if let Value::Object(map) = context {
        let names = rule_names(tokens).into_iter().map(Value::String).collect();
        map.insert(FIELD_RULES_KEY.to_string(), Value::Array(names));
    }
}
