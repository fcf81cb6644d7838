use crate::prelude::*;
use graphql_parser::query as q;
use q::Value::*;
use std::fmt;

/// The closed set of value kinds an argument can carry.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LiteralKind {
    Variable,
    Int,
    Float,
    String,
    Boolean,
    Null,
    Enum,
    List,
    Object,
}

impl LiteralKind {
    pub fn of<'t, Text: q::Text<'t>>(value: &q::Value<'t, Text>) -> Self {
        match value {
            Variable(_) => LiteralKind::Variable,
            Int(_) => LiteralKind::Int,
            Float(_) => LiteralKind::Float,
            String(_) => LiteralKind::String,
            Boolean(_) => LiteralKind::Boolean,
            Null => LiteralKind::Null,
            Enum(_) => LiteralKind::Enum,
            List(_) => LiteralKind::List,
            Object(_) => LiteralKind::Object,
        }
    }
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use LiteralKind::*;
        match self {
            Variable => write!(f, "Variable"),
            Int => write!(f, "Int"),
            Float => write!(f, "Float"),
            String => write!(f, "String"),
            Boolean => write!(f, "Boolean"),
            Null => write!(f, "Null"),
            Enum => write!(f, "Enum"),
            List => write!(f, "List"),
            Object => write!(f, "Object"),
        }
    }
}

/// Which literal kinds may take part in a channel key.
///
/// `Base` accepts strings and integers only. `Extended` also accepts
/// floats, booleans and enum values. Null, lists, objects and nested
/// variables are never accepted, since they have no single canonical
/// scalar text.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LiteralPolicy {
    Base,
    Extended,
}

impl Default for LiteralPolicy {
    fn default() -> Self {
        LiteralPolicy::Base
    }
}

impl LiteralPolicy {
    pub fn supports(&self, kind: LiteralKind) -> bool {
        match kind {
            LiteralKind::String | LiteralKind::Int => true,
            LiteralKind::Float | LiteralKind::Boolean | LiteralKind::Enum => {
                *self == LiteralPolicy::Extended
            }
            LiteralKind::Variable
            | LiteralKind::Null
            | LiteralKind::List
            | LiteralKind::Object => false,
        }
    }
}

/// Converts a resolved value into the text used inside a channel key.
pub trait Canonicalize {
    /// On failure, returns the kind that the policy rejected.
    fn canonicalize(&self, policy: LiteralPolicy) -> Result<std::string::String, LiteralKind>;
}

impl<'t, Text: q::Text<'t>> Canonicalize for q::Value<'t, Text> {
    fn canonicalize(&self, policy: LiteralPolicy) -> Result<std::string::String, LiteralKind> {
        profile_method!(canonicalize);

        let kind = LiteralKind::of(self);
        if !policy.supports(kind) {
            return Err(kind);
        }
        match self {
            String(s) => Ok(s.clone()),
            Int(i) => i.as_i64().map(|i| i.to_string()).ok_or(kind),
            Float(f) => Ok(f.to_string()),
            Boolean(b) => Ok(b.to_string()),
            Enum(e) => Ok(e.as_ref().to_owned()),
            Variable(_) | Null | List(_) | Object(_) => Err(kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Literal = q::Value<'static, &'static str>;

    fn int(i: i32) -> Literal {
        Literal::Int(i.into())
    }

    #[test]
    fn base_accepts_strings_and_ints() {
        let policy = LiteralPolicy::Base;
        assert_eq!(Ok("fuu".to_owned()), Literal::String("fuu".to_owned()).canonicalize(policy));
        assert_eq!(Ok("-42".to_owned()), int(-42).canonicalize(policy));
    }

    #[test]
    fn base_rejects_other_scalars() {
        let policy = LiteralPolicy::Base;
        assert_eq!(Err(LiteralKind::Float), Literal::Float(2.5).canonicalize(policy));
        assert_eq!(Err(LiteralKind::Boolean), Literal::Boolean(false).canonicalize(policy));
        assert_eq!(Err(LiteralKind::Enum), Literal::Enum("RED").canonicalize(policy));
    }

    #[test]
    fn extended_scalars() {
        let policy = LiteralPolicy::Extended;
        assert_eq!(Ok("2.5".to_owned()), Literal::Float(2.5).canonicalize(policy));
        assert_eq!(Ok("false".to_owned()), Literal::Boolean(false).canonicalize(policy));
        assert_eq!(Ok("RED".to_owned()), Literal::Enum("RED").canonicalize(policy));
    }

    #[test]
    fn compound_values_are_never_supported() {
        for policy in [LiteralPolicy::Base, LiteralPolicy::Extended].iter() {
            assert_eq!(Err(LiteralKind::Null), Literal::Null.canonicalize(*policy));
            assert_eq!(
                Err(LiteralKind::List),
                Literal::List(vec![int(1)]).canonicalize(*policy)
            );
            assert_eq!(
                Err(LiteralKind::Object),
                Literal::Object(Default::default()).canonicalize(*policy)
            );
            assert_eq!(
                Err(LiteralKind::Variable),
                Literal::Variable("id").canonicalize(*policy)
            );
        }
    }
}
