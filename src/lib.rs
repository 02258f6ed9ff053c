//! Rule-pipeline validation for dynamically shaped, nested input.
//!
//! Input is a `serde_json::Value` mapping of named fields, arbitrarily nested.
//! A [`RuleSpec`] maps field patterns (dotted paths, optionally containing `*`
//! wildcards) to rule pipelines. A [`Validator`] runs every pipeline and
//! reports per-field messages, the names of the rules that failed, and a
//! projection holding only the fields that were checked:
//!
//! ```text
//! RuleSpec + data → expand_pattern → parse_rule → RuleRegistry → Rule::validate
//!                 → ErrorBag / failed rules / validated projection
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use fieldcheck::{RuleSpec, Validator};
//! use serde_json::json;
//!
//! let data = json!({
//!     "name": "Ada",
//!     "items": [{"price": 10}, {"price": "free"}],
//! });
//!
//! let rules = RuleSpec::new()
//!     .field("name", "required|string|max:255")
//!     .field("items.*.price", "required|numeric");
//!
//! let mut validator = Validator::new(data, rules);
//! assert!(validator.fails().unwrap());
//! assert_eq!(
//!     validator.errors().unwrap().first("items.1.price"),
//!     Some("The items price must be a number.")
//! );
//! ```
//!
//! # Feature Flags
//!
//! | Feature      | Default | Description |
//! |--------------|---------|-------------|
//! | `date-rules` | yes     | `date`, `after` and `before` rules via the [`chrono`] crate. |
//! | `url-rule`   | yes     | WHATWG URL parsing for the `url` rule via the [`url`] crate; without it a pattern check is used. |

pub mod bag;
pub mod error;
pub mod parse;
pub mod primitives;
pub mod registry;
pub mod rules;
pub mod types;
pub mod validator;

pub use bag::ErrorBag;
pub use error::*;
pub use registry::{RuleRegistry, RuleSource};
pub use rules::{NamedParams, Rule, RowLookup};
pub use types::*;
pub use validator::Validator;

pub use parse::parse_rule;
pub use primitives::expand_pattern;

use serde_json::{Map, Value};

/// Convenience entry point: validates `data` against `rules` with the global
/// registry and returns the validated projection.
///
/// # Errors
///
/// [`Error::Failed`] carrying every message when the input does not pass,
/// [`Error::Config`] when the rules themselves are broken.
///
/// # Example
///
/// ```rust
/// use fieldcheck::RuleSpec;
/// use serde_json::json;
///
/// let rules = RuleSpec::new().field("email", "required|email");
///
/// let clean = fieldcheck::validate(json!({"email": "ada@example.com", "admin": true}), rules)
///     .expect("valid input");
/// assert_eq!(clean.get("email"), Some(&json!("ada@example.com")));
/// assert!(clean.get("admin").is_none());
/// ```
pub fn validate(data: Value, rules: RuleSpec) -> Result<Map<String, Value>, Error> {
    Validator::new(data, rules).validated()
}

/// Loads a rule-set document, reading it as JSON when it starts with `{`
/// and as YAML otherwise.
pub fn load_rule_set(input: &str) -> Result<RuleSet, ParseError> {
    if input.trim_start().starts_with('{') {
        RuleSet::from_json(input)
    } else {
        RuleSet::from_yaml(input)
    }
}
