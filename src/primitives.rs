//! Path primitives over nested input data.
//!
//! Paths are dot-separated; sequence elements are addressed by their decimal
//! index (`items.0.price`). A `*` segment in a pattern fans out over every key
//! or index of the node it is applied to.

use serde_json::{Map, Value};

/// The wildcard segment.
pub const WILDCARD: &str = "*";

// ─── expand_pattern ──────────────────────────────────────────────────────────

/// Expands a field pattern into the concrete paths it denotes in `data`.
///
/// A pattern without `*` is returned unchanged, whether or not it exists.
/// Otherwise the pattern is walked segment by segment:
///
/// - a literal segment is appended to every branch, descending into the node
///   when it has that key and into a "missing" node otherwise, so the final
///   segment may name a key that does not exist;
/// - a `*` segment replaces every branch with one branch per key (mappings)
///   or index (sequences) of its node, and drops branches whose node is
///   missing or a scalar.
///
/// Expansion stops with an empty result as soon as no branch is left. Paths
/// come back in the iteration order of the data.
pub fn expand_pattern(pattern: &str, data: &Value) -> Vec<String> {
    if !pattern.contains(WILDCARD) {
        return vec![pattern.to_string()];
    }

    let mut frontier: Vec<(String, Option<&Value>)> = vec![(String::new(), Some(data))];

    for segment in pattern.split('.') {
        let mut next = Vec::new();

        for (base, node) in frontier {
            if segment == WILDCARD {
                match node {
                    Some(Value::Object(map)) => {
                        for (key, child) in map {
                            next.push((join(&base, key), Some(child)));
                        }
                    }
                    Some(Value::Array(items)) => {
                        for (i, child) in items.iter().enumerate() {
                            next.push((join(&base, &i.to_string()), Some(child)));
                        }
                    }
                    _ => {}
                }
            } else {
                let child = node.and_then(|n| step(n, segment));
                next.push((join(&base, segment), child));
            }
        }

        if next.is_empty() {
            return Vec::new();
        }
        frontier = next;
    }

    frontier.into_iter().map(|(path, _)| path).collect()
}

fn join(base: &str, segment: &str) -> String {
    if base.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", base, segment)
    }
}

/// Descends one segment: a key of a mapping or an index of a sequence.
fn step<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => index(segment).and_then(|i| items.get(i)),
        _ => None,
    }
}

/// A sequence index in canonical decimal form: `0`, `7`, `12`, never `+1` or `01`.
fn index(segment: &str) -> Option<usize> {
    let canonical = !segment.is_empty()
        && segment.bytes().all(|b| b.is_ascii_digit())
        && (segment == "0" || !segment.starts_with('0'));
    if canonical { segment.parse().ok() } else { None }
}

// ─── resolve_value / has_path ────────────────────────────────────────────────

/// Resolves a concrete dot-path, returning `None` if any segment is absent or
/// a scalar is indexed. A present-but-null leaf resolves to `Some(Null)`.
pub fn resolve_value<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = data;
    for segment in path.split('.') {
        current = step(current, segment)?;
    }
    Some(current)
}

/// True when every segment of `path` exists in `data`, even if the leaf is null.
pub fn has_path(data: &Value, path: &str) -> bool {
    resolve_value(data, path).is_some()
}

// ─── set_path ────────────────────────────────────────────────────────────────

/// Writes `value` at `path` inside `target`, creating intermediate containers.
///
/// Containers are shaped after `source`: where the source has a sequence the
/// projection gets a sequence (padded with nulls up to the written index),
/// everywhere else a mapping. Intermediate scalars are replaced.
pub fn set_path(target: &mut Value, source: &Value, path: &str, value: Value) {
    let segments: Vec<&str> = path.split('.').collect();
    set_in(target, Some(source), &segments, value);
}

fn set_in(node: &mut Value, source: Option<&Value>, segments: &[&str], value: Value) {
    let Some((head, tail)) = segments.split_first() else {
        *node = value;
        return;
    };

    let child_source = source.and_then(|s| step(s, head));

    let slot = match (source, index(head)) {
        (Some(Value::Array(_)), Some(index)) => {
            if !node.is_array() {
                *node = Value::Array(Vec::new());
            }
            let Value::Array(items) = node else {
                return;
            };
            if items.len() <= index {
                items.resize(index + 1, Value::Null);
            }
            &mut items[index]
        }
        _ => {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            let Value::Object(map) = node else {
                return;
            };
            map.entry(head.to_string()).or_insert(Value::Null)
        }
    };

    set_in(slot, child_source, tail, value);
}

// ─── Value helpers ───────────────────────────────────────────────────────────

/// Null, a blank-after-trim string, or a zero-length sequence or mapping.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Human-readable rendering of a field path.
///
/// Underscores and dots become spaces and numeric index segments are dropped:
/// `users.0.first_name` → `users first name`.
pub fn friendly_attribute(field: &str) -> String {
    let segments: Vec<&str> = field.split('.').collect();
    let named: Vec<&str> = segments
        .iter()
        .copied()
        .filter(|s| s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()))
        .collect();
    let kept = if named.is_empty() { segments } else { named };

    kept.join(" ").replace('_', " ").trim().to_string()
}

/// Renders a scalar as message text. Whole floats print without a fraction.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Value::Array(items) => items.iter().map(display_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// Numeric view of a value: numbers, and strings that read as numbers.
pub fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => match crate::parse::coerce_parameter(s.trim()) {
            Value::Number(n) => n.as_f64(),
            _ => None,
        },
        _ => None,
    }
}
