use crate::coercion::{Canonicalize, LiteralKind, LiteralPolicy};
use crate::errors::{Exclusion, RequestError};
use crate::keys::{channel_key, FieldDescriptor, KeyBuilder, ResolvedArgument, ValuesOnly};
use crate::prelude::*;
use crate::selection::{subscription_selection_sets, RootSelection};
use crate::variables::QueryVariables;
use graphql_parser::{parse_query, query as q};

/// Turns subscription operations into channel descriptors.
///
/// A field is resolved all-or-nothing: if any one of its arguments cannot
/// be resolved the field is left out entirely, so two subscriptions that
/// differ only in an unresolved argument never end up on the same channel.
#[derive(Debug, Clone, Default)]
pub struct Resolver<B = ValuesOnly> {
    literals: LiteralPolicy,
    root: RootSelection,
    builder: B,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: KeyBuilder> Resolver<B> {
    pub fn with_literals(mut self, literals: LiteralPolicy) -> Self {
        self.literals = literals;
        self
    }

    pub fn with_root_selection(mut self, root: RootSelection) -> Self {
        self.root = root;
        self
    }

    pub fn with_builder<B2: KeyBuilder>(self, builder: B2) -> Resolver<B2> {
        Resolver {
            literals: self.literals,
            root: self.root,
            builder,
        }
    }

    /// Descriptors for every subscription in `document` that resolves,
    /// in document order.
    pub fn resolve<'t, T: q::Text<'t>>(
        &self,
        document: &q::Document<'t, T>,
        variables: &QueryVariables,
    ) -> Vec<FieldDescriptor> {
        profile_method!(resolve);

        self.analyze(document, variables)
            .into_iter()
            .filter_map(Result::ok)
            .collect()
    }

    /// One entry per subscription selection set in `document`, in document
    /// order, carrying either its descriptor or the reason it was excluded.
    pub fn analyze<'t, T: q::Text<'t>>(
        &self,
        document: &q::Document<'t, T>,
        variables: &QueryVariables,
    ) -> Vec<Result<FieldDescriptor, Exclusion>> {
        profile_method!(analyze);

        subscription_selection_sets(document)
            .into_iter()
            .map(|set| self.resolve_selection_set(set, variables))
            .collect()
    }

    pub fn resolve_selection_set<'t, T: q::Text<'t>>(
        &self,
        set: &q::SelectionSet<'t, T>,
        variables: &QueryVariables,
    ) -> Result<FieldDescriptor, Exclusion> {
        profile_method!(resolve_selection_set);

        let field = self.root.root_field(set)?;
        let args = field
            .arguments
            .iter()
            .map(|(name, value)| self.resolve_argument(name.as_ref(), value, variables))
            .collect::<Result<Vec<_>, _>>()?;

        let name = field.name.as_ref();
        let channel = channel_key(&self.builder, name, args);
        Ok(FieldDescriptor::new(name, channel))
    }

    fn resolve_argument<'t, T: q::Text<'t>>(
        &self,
        name: &str,
        value: &q::Value<'t, T>,
        variables: &QueryVariables,
    ) -> Result<ResolvedArgument, Exclusion> {
        profile_method!(resolve_argument);

        let text = match value {
            q::Value::Variable(var) => match variables.get(var.as_ref()) {
                Some(bound) => bound.canonicalize(self.literals),
                None => return Err(Exclusion::MissingVariable(var.as_ref().to_owned())),
            },
            literal => literal.canonicalize(self.literals),
        };

        match text {
            Ok(text) if text.is_empty() => Err(Exclusion::EmptyValue(name.to_owned())),
            Ok(text) => Ok(ResolvedArgument::new(name, text)),
            Err(kind) => Err(unsupported(name, kind)),
        }
    }

    /// Parses a raw request and resolves it.
    pub fn resolve_request(
        &self,
        query: &str,
        variables: &str,
    ) -> Result<Vec<FieldDescriptor>, RequestError> {
        profile_method!(resolve_request);

        let (document, variables) = parse_request(query, variables)?;
        Ok(self.resolve(&document, &variables))
    }

    /// Parses a raw request and analyzes it.
    pub fn analyze_request(
        &self,
        query: &str,
        variables: &str,
    ) -> Result<Vec<Result<FieldDescriptor, Exclusion>>, RequestError> {
        profile_method!(analyze_request);

        let (document, variables) = parse_request(query, variables)?;
        Ok(self.analyze(&document, &variables))
    }
}

fn unsupported(argument: &str, kind: LiteralKind) -> Exclusion {
    Exclusion::UnsupportedLiteral {
        argument: argument.to_owned(),
        kind,
    }
}

fn parse_request<'q>(
    query: &'q str,
    variables: &str,
) -> Result<(q::Document<'q, &'q str>, QueryVariables), RequestError> {
    let variables = crate::parse_vars(variables).map_err(|_| RequestError::FailedToParseVariables)?;
    let document = parse_query::<&'q str>(query).map_err(|_| RequestError::FailedToParseQuery)?;
    Ok((document, variables))
}
