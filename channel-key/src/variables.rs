use crate::coercion::{Canonicalize, LiteralKind, LiteralPolicy};
use crate::prelude::*;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// A variable value as sent in the client's JSON payload.
///
/// JSON has no enum values or variable references, so a binding never
/// holds either. Integers are kept at full `i64` width, so a bound
/// integer produces the same key text as the same integer written as a
/// literal. Only numbers with a fraction, or outside `i64`, are `Float`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Binding {
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Null,
    List(Vec<Binding>),
    Object(BTreeMap<String, Binding>),
}

impl Binding {
    pub fn kind(&self) -> LiteralKind {
        match self {
            Binding::Int(_) => LiteralKind::Int,
            Binding::Float(_) => LiteralKind::Float,
            Binding::String(_) => LiteralKind::String,
            Binding::Boolean(_) => LiteralKind::Boolean,
            Binding::Null => LiteralKind::Null,
            Binding::List(_) => LiteralKind::List,
            Binding::Object(_) => LiteralKind::Object,
        }
    }
}

impl Canonicalize for Binding {
    fn canonicalize(&self, policy: LiteralPolicy) -> Result<String, LiteralKind> {
        profile_method!(canonicalize);

        let kind = self.kind();
        if !policy.supports(kind) {
            return Err(kind);
        }
        match self {
            Binding::String(s) => Ok(s.clone()),
            Binding::Int(i) => Ok(i.to_string()),
            Binding::Float(f) => Ok(f.to_string()),
            Binding::Boolean(b) => Ok(b.to_string()),
            Binding::Null | Binding::List(_) | Binding::Object(_) => Err(kind),
        }
    }
}

/// Variable bindings for one subscription request.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct QueryVariables(pub HashMap<String, Binding>);

impl QueryVariables {
    pub fn new() -> Self {
        QueryVariables(HashMap::new())
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Binding>) {
        self.0.insert(name.into(), value.into());
    }
}

impl From<i32> for Binding {
    fn from(value: i32) -> Self {
        Binding::Int(value.into())
    }
}

impl From<i64> for Binding {
    fn from(value: i64) -> Self {
        Binding::Int(value)
    }
}

impl From<f64> for Binding {
    fn from(value: f64) -> Self {
        Binding::Float(value)
    }
}

impl From<bool> for Binding {
    fn from(value: bool) -> Self {
        Binding::Boolean(value)
    }
}

impl From<String> for Binding {
    fn from(value: String) -> Self {
        Binding::String(value)
    }
}

impl From<&'_ str> for Binding {
    fn from(value: &str) -> Self {
        Binding::String(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_vars;

    fn binding(json: &str) -> Binding {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn json_kinds() {
        assert_eq!(Binding::Int(2), binding("2"));
        assert_eq!(Binding::Int(-7), binding("-7"));
        assert_eq!(Binding::Float(3.5), binding("3.5"));
        assert_eq!(Binding::String("bbb".to_owned()), binding(r#""bbb""#));
        assert_eq!(Binding::Boolean(false), binding("false"));
        assert_eq!(Binding::Null, binding("null"));
        assert_eq!(Binding::List(vec![Binding::Int(1)]), binding("[1]"));
        assert_eq!(LiteralKind::Object, binding(r#"{"a": 1}"#).kind());
    }

    #[test]
    fn integers_beyond_i32() {
        assert_eq!(Binding::Int(3_000_000_000), binding("3000000000"));
        assert_eq!(
            Ok("9007199254740993".to_owned()),
            binding("9007199254740993").canonicalize(LiteralPolicy::Base)
        );
        assert_eq!(
            Ok(i64::MAX.to_string()),
            binding(&i64::MAX.to_string()).canonicalize(LiteralPolicy::Extended)
        );
    }

    #[test]
    fn beyond_i64_is_float() {
        assert_eq!(LiteralKind::Float, binding("18446744073709551616").kind());
    }

    #[test]
    fn base_policy() {
        let policy = LiteralPolicy::Base;
        assert_eq!(Ok("bbb".to_owned()), Binding::from("bbb").canonicalize(policy));
        assert_eq!(Ok("2".to_owned()), Binding::from(2i32).canonicalize(policy));
        assert_eq!(Err(LiteralKind::Float), Binding::from(2.5).canonicalize(policy));
        assert_eq!(Err(LiteralKind::Boolean), Binding::from(true).canonicalize(policy));
        assert_eq!(Err(LiteralKind::Null), Binding::Null.canonicalize(policy));
    }

    #[test]
    fn extended_policy() {
        let policy = LiteralPolicy::Extended;
        assert_eq!(Ok("2.5".to_owned()), Binding::from(2.5).canonicalize(policy));
        assert_eq!(Ok("true".to_owned()), Binding::from(true).canonicalize(policy));
        assert_eq!(
            Err(LiteralKind::List),
            Binding::List(Vec::new()).canonicalize(policy)
        );
    }

    #[test]
    fn parses_request_variables() {
        let vars = parse_vars(r#"{"id": 3000000000, "aaa": "bbb"}"#).unwrap();
        assert_eq!(Some(&Binding::Int(3_000_000_000)), vars.get("id"));
        assert_eq!(Some(&Binding::from("bbb")), vars.get("aaa"));
        assert_eq!(None, vars.get("missing"));
        assert_eq!(QueryVariables::new(), parse_vars(" null ").unwrap());
        assert!(parse_vars("[1]").is_err());
    }
}
