use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::rules::Rule;

// ─── RuleToken ───────────────────────────────────────────────────────────────

/// One element of a rule pipeline.
#[derive(Clone)]
pub enum RuleToken {
    /// A `name:arg1,arg2` token resolved through the registry.
    Token(String),
    /// A pre-built rule used as-is.
    Rule(Arc<dyn Rule>),
}

impl RuleToken {
    /// Wraps a pre-built rule instance.
    pub fn rule(rule: impl Rule + 'static) -> Self {
        RuleToken::Rule(Arc::new(rule))
    }

    /// Rule name without parameters (`"max:100"` → `"max"`).
    pub fn name(&self) -> &str {
        match self {
            RuleToken::Token(token) => token.split_once(':').map_or(token.as_str(), |(n, _)| n),
            RuleToken::Rule(rule) => rule.rule_name(),
        }
    }

    /// True for a string token naming exactly `modifier` (`bail`, `nullable`, ...).
    pub fn is_modifier(&self, modifier: &str) -> bool {
        matches!(self, RuleToken::Token(token) if token == modifier)
    }
}

impl fmt::Debug for RuleToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleToken::Token(token) => f.debug_tuple("Token").field(token).finish(),
            RuleToken::Rule(rule) => f.debug_tuple("Rule").field(&rule.rule_name()).finish(),
        }
    }
}

impl From<&str> for RuleToken {
    fn from(token: &str) -> Self {
        RuleToken::Token(token.to_string())
    }
}

impl From<String> for RuleToken {
    fn from(token: String) -> Self {
        RuleToken::Token(token)
    }
}

impl From<Arc<dyn Rule>> for RuleToken {
    fn from(rule: Arc<dyn Rule>) -> Self {
        RuleToken::Rule(rule)
    }
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

/// The ordered rules attached to one field pattern.
#[derive(Clone, Debug)]
pub enum Pipeline {
    /// `"required|string|max:255"`.
    Piped(String),
    /// An explicit list of tokens and pre-built rules.
    List(Vec<RuleToken>),
}

impl Pipeline {
    /// Normalizes the pipeline to its ordered list of tokens.
    pub fn tokens(&self) -> Vec<RuleToken> {
        match self {
            Pipeline::Piped(s) => crate::parse::split_pipeline(s)
                .into_iter()
                .map(RuleToken::Token)
                .collect(),
            Pipeline::List(tokens) => tokens.clone(),
        }
    }
}

impl From<&str> for Pipeline {
    fn from(s: &str) -> Self {
        Pipeline::Piped(s.to_string())
    }
}

impl From<String> for Pipeline {
    fn from(s: String) -> Self {
        Pipeline::Piped(s)
    }
}

impl From<Vec<RuleToken>> for Pipeline {
    fn from(tokens: Vec<RuleToken>) -> Self {
        Pipeline::List(tokens)
    }
}

impl From<Vec<&str>> for Pipeline {
    fn from(tokens: Vec<&str>) -> Self {
        Pipeline::List(tokens.into_iter().map(RuleToken::from).collect())
    }
}

impl<'de> Deserialize<'de> for Pipeline {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PipelineVisitor;

        impl<'de> Visitor<'de> for PipelineVisitor {
            type Value = Pipeline;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a pipe-delimited rule string or a list of rule strings")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Pipeline, E> {
                Ok(Pipeline::Piped(v.to_string()))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Pipeline, A::Error> {
                let mut tokens = Vec::new();
                while let Some(token) = seq.next_element::<String>()? {
                    tokens.push(RuleToken::Token(token));
                }
                Ok(Pipeline::List(tokens))
            }
        }

        deserializer.deserialize_any(PipelineVisitor)
    }
}

// ─── RuleSpec ────────────────────────────────────────────────────────────────

/// Field pattern → pipeline, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct RuleSpec {
    entries: IndexMap<String, Pipeline>,
}

impl RuleSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces, keeping its position) the pipeline for `pattern`.
    pub fn field(mut self, pattern: impl Into<String>, pipeline: impl Into<Pipeline>) -> Self {
        self.insert(pattern, pipeline);
        self
    }

    pub fn insert(&mut self, pattern: impl Into<String>, pipeline: impl Into<Pipeline>) {
        self.entries.insert(pattern.into(), pipeline.into());
    }

    pub fn get(&self, pattern: &str) -> Option<&Pipeline> {
        self.entries.get(pattern)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Pipeline)> {
        self.entries.iter().map(|(p, pipeline)| (p.as_str(), pipeline))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, P> FromIterator<(K, P)> for RuleSpec
where
    K: Into<String>,
    P: Into<Pipeline>,
{
    fn from_iter<I: IntoIterator<Item = (K, P)>>(iter: I) -> Self {
        let mut spec = RuleSpec::new();
        for (pattern, pipeline) in iter {
            spec.insert(pattern, pipeline);
        }
        spec
    }
}

impl<'de> Deserialize<'de> for RuleSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RuleSpecVisitor;

        impl<'de> Visitor<'de> for RuleSpecVisitor {
            type Value = RuleSpec;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of field patterns to rule pipelines")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RuleSpec, A::Error> {
                let mut spec = RuleSpec::new();
                while let Some((pattern, pipeline)) = map.next_entry::<String, Pipeline>()? {
                    spec.insert(pattern, pipeline);
                }
                Ok(spec)
            }
        }

        deserializer.deserialize_map(RuleSpecVisitor)
    }
}

// ─── ParsedRule ──────────────────────────────────────────────────────────────

/// A rule token split into its name and coerced positional parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedRule {
    pub name: String,
    pub params: Vec<Value>,
}

// ─── RuleSet ─────────────────────────────────────────────────────────────────

/// A declarative validation setup loaded from YAML or JSON.
///
/// ```yaml
/// rules:
///   name: required|string|max:255
///   items.*.price: [required, numeric]
/// messages:
///   items.*.price.numeric: "Each price must be a number."
/// attributes:
///   email: email address
/// stop_on_first_failure: false
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSet {
    pub rules: RuleSpec,
    #[serde(default)]
    pub messages: HashMap<String, String>,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    #[serde(default)]
    pub stop_on_first_failure: bool,
}
