mod conformance {
    pub mod common;
    mod expand;
    mod parse_rule;
    mod validator;
}
