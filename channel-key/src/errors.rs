use crate::coercion::LiteralKind;
use std::{error, fmt};

/// Why a subscription selection set produced no channel.
///
/// These are never returned as errors from `resolve`. The owning field is
/// simply left out of the result.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Exclusion {
    EmptySelectionSet,
    RootIsNotField,
    MultipleRootSelections(usize),
    MissingVariable(String),
    UnsupportedLiteral { argument: String, kind: LiteralKind },
    EmptyValue(String),
}

impl Exclusion {
    /// A stable name for grouping exclusions, independent of the argument
    /// or variable involved.
    pub fn name(&self) -> &'static str {
        use Exclusion::*;
        match self {
            EmptySelectionSet => "Empty selection set",
            RootIsNotField => "Root selection is not a field",
            MultipleRootSelections(_) => "Multiple root selections",
            MissingVariable(_) => "Missing variable",
            UnsupportedLiteral { .. } => "Unsupported literal",
            EmptyValue(_) => "Empty value",
        }
    }
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Exclusion::*;
        match self {
            EmptySelectionSet => write!(f, "Subscription selects nothing"),
            RootIsNotField => write!(f, "First root selection is a fragment, not a field"),
            MultipleRootSelections(count) => {
                write!(f, "Subscription has {} root selections, expected 1", count)
            }
            MissingVariable(name) => write!(f, "Variable ${} is not bound", name),
            UnsupportedLiteral { argument, kind } => {
                write!(f, "Argument {} has unsupported kind {}", argument, kind)
            }
            EmptyValue(argument) => write!(f, "Argument {} resolved to an empty value", argument),
        }
    }
}

impl error::Error for Exclusion {}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum RequestError {
    FailedToParseQuery,
    FailedToParseVariables,
}

impl error::Error for RequestError {}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use RequestError::*;
        match self {
            FailedToParseQuery => write!(f, "Failed to parse query"),
            FailedToParseVariables => write!(f, "Failed to parse variables"),
        }
    }
}
