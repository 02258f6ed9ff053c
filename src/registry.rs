//! Rule-name → rule registry.
//!
//! Registration (which names exist and how to build them) is process-wide and
//! lives in a [`RuleRegistry`]. Built instances are cached per validator in a
//! [`ResolvedRules`], so an instance holding an attached capability is never
//! shared between independent validation runs.
//!
//! Registration is read-mostly: finish registering before validating. The
//! tables are behind locks, but registering or resetting while a run is in
//! flight can change what that run resolves.

use crate::error::ConfigError;
use crate::rules::{NamedParams, Rule, RuleConstructor, builtin_rules, construct};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

/// How a registered rule is built.
#[derive(Clone)]
pub enum RuleSource {
    /// A zero-argument constructor.
    Constructor(RuleConstructor),
    /// A factory closure; an `Err` reason means it could not produce a rule.
    Factory(RuleFactory),
}

pub type RuleFactory = Arc<dyn Fn() -> Result<Arc<dyn Rule>, String> + Send + Sync>;

/// A bare predicate registered with [`RuleRegistry::extend_callback`].
pub type RuleCallback = Arc<dyn Fn(&str, &Value, &NamedParams, &Value) -> bool + Send + Sync>;

static GLOBAL: LazyLock<Arc<RuleRegistry>> = LazyLock::new(|| Arc::new(RuleRegistry::with_defaults()));

#[derive(Default)]
pub struct RuleRegistry {
    rules: RwLock<HashMap<String, RuleSource>>,
    callbacks: RwLock<HashMap<String, RuleCallback>>,
}

impl RuleRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in rule under its own name.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register_defaults();
        registry
    }

    /// The process-wide registry, seeded with the built-in rules on first use.
    pub fn global() -> Arc<RuleRegistry> {
        Arc::clone(&GLOBAL)
    }

    /// Registers every built-in rule, overwriting same-named registrations.
    pub fn register_defaults(&self) {
        for (name, constructor) in builtin_rules() {
            self.register(name, RuleSource::Constructor(constructor));
        }
    }

    /// Registers `source` under `name`, replacing any earlier registration.
    pub fn register(&self, name: impl Into<String>, source: RuleSource) {
        let name = name.into();
        tracing::trace!(rule = %name, "registering rule");
        self.rules
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, source);
    }

    /// Registers a default-constructible rule type.
    pub fn register_type<R: Rule + Default + 'static>(&self, name: impl Into<String>) {
        self.register(name, RuleSource::Constructor(construct::<R>));
    }

    /// Registers a factory closure, e.g. one that attaches a capability.
    pub fn register_factory<F>(&self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<Arc<dyn Rule>, String> + Send + Sync + 'static,
    {
        self.register(name, RuleSource::Factory(Arc::new(factory)));
    }

    /// Registers `name` with whatever is registered as `target`.
    ///
    /// Fails when `target` is not registered, leaving `name` untouched.
    pub fn register_alias(&self, name: impl Into<String>, target: &str) -> Result<(), ConfigError> {
        let name = name.into();
        let source = self.source(target).ok_or_else(|| ConfigError::Registration {
            name: name.clone(),
            target: target.to_string(),
        })?;
        self.register(name, source);
        Ok(())
    }

    /// Registers a bare predicate. Callbacks take precedence over rules of the same name.
    pub fn extend_callback<F>(&self, name: impl Into<String>, callback: F)
    where
        F: Fn(&str, &Value, &NamedParams, &Value) -> bool + Send + Sync + 'static,
    {
        self.callbacks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), Arc::new(callback));
    }

    pub fn callback(&self, name: &str) -> Option<RuleCallback> {
        self.callbacks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Removes every rule and callback registration.
    pub fn reset(&self) {
        self.rules.write().unwrap_or_else(PoisonError::into_inner).clear();
        self.callbacks.write().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn source(&self, name: &str) -> Option<RuleSource> {
        self.rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Builds a fresh instance of the rule registered as `name`.
    pub fn instantiate(&self, name: &str) -> Result<Arc<dyn Rule>, ConfigError> {
        let source = self.source(name).ok_or_else(|| ConfigError::UnknownRule {
            name: name.to_string(),
        })?;

        match source {
            RuleSource::Constructor(constructor) => Ok(constructor()),
            RuleSource::Factory(factory) => factory().map_err(|reason| ConfigError::InvalidRuleType {
                name: name.to_string(),
                reason,
            }),
        }
    }
}

/// Per-validator cache of built rule instances.
#[derive(Default)]
pub struct ResolvedRules {
    instances: HashMap<String, Arc<dyn Rule>>,
}

impl ResolvedRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached instance for `name`, building and caching it on first use.
    pub fn resolve(&mut self, registry: &RuleRegistry, name: &str) -> Result<Arc<dyn Rule>, ConfigError> {
        if let Some(rule) = self.instances.get(name) {
            return Ok(Arc::clone(rule));
        }

        let rule = registry.instantiate(name)?;
        self.instances.insert(name.to_string(), Arc::clone(&rule));
        Ok(rule)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }
}
