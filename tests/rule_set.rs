use fieldcheck::error::ParseErrorKind;
use fieldcheck::{Pipeline, RuleSet, RuleSpec};

fn patterns(set: &RuleSet) -> Vec<&str> {
    set.rules.iter().map(|(pattern, _)| pattern).collect()
}

#[test]
fn yaml_keeps_declaration_order() {
    let set = RuleSet::from_yaml(
        r#"
rules:
  zeta: required
  alpha: "required|email"
  "items.*.sku": [required, "regex:^[A-Z]{3}-\\d+$"]
  middle: nullable
"#,
    )
    .unwrap();

    assert_eq!(patterns(&set), vec!["zeta", "alpha", "items.*.sku", "middle"]);
    assert!(!set.stop_on_first_failure);
    assert!(set.messages.is_empty());

    let tokens = set.rules.get("items.*.sku").unwrap().tokens();
    let names: Vec<&str> = tokens.iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["required", "regex"]);
}

#[test]
fn json_keeps_declaration_order() {
    let set = RuleSet::from_json(
        r#"{
            "rules": {"b": "required", "a": ["bail", "integer"]},
            "messages": {"a.integer": "Whole numbers only."},
            "attributes": {"a": "amount"},
            "stop_on_first_failure": true
        }"#,
    )
    .unwrap();

    assert_eq!(patterns(&set), vec!["b", "a"]);
    assert!(matches!(set.rules.get("a"), Some(Pipeline::List(tokens)) if tokens.len() == 2));
    assert!(matches!(set.rules.get("b"), Some(Pipeline::Piped(s)) if s == "required"));
    assert_eq!(set.messages["a.integer"], "Whole numbers only.");
    assert_eq!(set.attributes["a"], "amount");
    assert!(set.stop_on_first_failure);
}

#[test]
fn empty_input_is_a_syntax_error() {
    let err = RuleSet::from_yaml("   \n").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::Syntax);
    assert_eq!(RuleSet::from_json("").unwrap_err().kind, ParseErrorKind::Syntax);
}

#[test]
fn malformed_input_is_a_syntax_error() {
    assert_eq!(RuleSet::from_json("{\"rules\": ").unwrap_err().kind, ParseErrorKind::Syntax);
    assert_eq!(RuleSet::from_yaml("rules: [unclosed").unwrap_err().kind, ParseErrorKind::Syntax);
}

#[test]
fn non_mapping_root_is_a_type_mismatch() {
    let err = RuleSet::from_yaml("- required\n- email\n").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::TypeMismatch);
}

#[test]
fn unknown_top_level_key_is_named() {
    let err = RuleSet::from_yaml("rules:\n  a: required\nrulez:\n  b: required\n").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::TypeMismatch);
    assert_eq!(err.path.as_deref(), Some("rulez"));
    assert_eq!(err.to_string(), "unknown top-level field: rulez at rulez");
}

#[test]
fn pipeline_must_be_text_or_list() {
    let err = RuleSet::from_yaml("rules:\n  a: 5\n").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::TypeMismatch);
}

#[test]
fn load_rule_set_detects_the_format() {
    let from_json = fieldcheck::load_rule_set(r#"{"rules": {"a": "required"}}"#).unwrap();
    let from_yaml = fieldcheck::load_rule_set("rules:\n  a: required\n").unwrap();
    assert_eq!(patterns(&from_json), patterns(&from_yaml));
}

#[test]
fn replacing_a_pattern_keeps_its_position() {
    let mut rules = RuleSpec::new().field("a", "required").field("b", "string").field("c", "integer");
    rules.insert("a", "filled");

    let order: Vec<&str> = rules.iter().map(|(pattern, _)| pattern).collect();
    assert_eq!(order, vec!["a", "b", "c"]);
    assert_eq!(rules.len(), 3);
    assert!(matches!(rules.get("a"), Some(Pipeline::Piped(text)) if text == "filled"));
    assert!(rules.get("d").is_none());
}
