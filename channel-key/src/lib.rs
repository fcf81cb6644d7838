//! Channel keys for GraphQL subscriptions.
//!
//! A pub-sub layer routes each published event to the subscriptions
//! listening on its channel. This crate derives that channel from a parsed
//! subscription request and its variables:
//!
//! ```text
//! subscription { hello(id: 1, aaa: "fuu") { foo bar } }   =>   hello:fuu:1
//! ```
//!
//! Only subscription operations are considered, and only the first root
//! field of each. Arguments are resolved from literals or variables,
//! sorted by name, and their values appended to the field name.

mod coercion;
mod errors;
mod keys;
mod resolver;
mod selection;
mod variables;

pub use coercion::{Canonicalize, LiteralKind, LiteralPolicy};
pub use errors::{Exclusion, RequestError};
pub use graphql_parser;
pub use keys::{channel_key, FieldDescriptor, KeyBuilder, NamedPairs, ResolvedArgument, ValuesOnly};
pub use resolver::Resolver;
pub use selection::{subscription_selection_sets, RootSelection};
pub use variables::{Binding, QueryVariables};

use graphql_parser::query as q;

mod prelude {
    pub use firestorm::{profile_fn, profile_method};
}

/// Resolves `document` with the default policy: string and integer
/// literals, first root field, values-only keys.
pub fn resolve<'t, T: q::Text<'t>>(
    document: &q::Document<'t, T>,
    variables: &QueryVariables,
) -> Vec<FieldDescriptor> {
    Resolver::new().resolve(document, variables)
}

/// Parses the JSON variables of a request. Empty text, `{}` and `null`
/// all mean no variables.
pub fn parse_vars(vars: &str) -> Result<QueryVariables, serde_json::Error> {
    let vars = vars.trim();
    if ["{}", "null", ""].contains(&vars) {
        Ok(QueryVariables::new())
    } else {
        serde_json::from_str(vars)
    }
}
