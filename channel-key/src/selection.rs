use crate::errors::Exclusion;
use crate::prelude::*;
use graphql_parser::query as q;

/// Selection sets of every subscription operation in `document`, in
/// document order. Queries, mutations, shorthand selection sets and
/// fragment definitions contribute nothing.
pub fn subscription_selection_sets<'d, 't, T: q::Text<'t>>(
    document: &'d q::Document<'t, T>,
) -> Vec<&'d q::SelectionSet<'t, T>> {
    profile_fn!(subscription_selection_sets);

    document
        .definitions
        .iter()
        .filter_map(|definition| match definition {
            q::Definition::Operation(q::OperationDefinition::Subscription(subscription)) => {
                Some(&subscription.selection_set)
            }
            q::Definition::Operation(_) | q::Definition::Fragment(_) => None,
        })
        .collect()
}

/// How the root field of a subscription is taken from its selection set.
///
/// A subscription is expected to select exactly one root field. Under
/// `First` any selections after the first are ignored. Under `Single` a
/// set with more than one selection is excluded. Both exclude an empty set
/// and a set whose first selection is a fragment.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RootSelection {
    First,
    Single,
}

impl Default for RootSelection {
    fn default() -> Self {
        RootSelection::First
    }
}

impl RootSelection {
    pub fn root_field<'d, 't, T: q::Text<'t>>(
        &self,
        set: &'d q::SelectionSet<'t, T>,
    ) -> Result<&'d q::Field<'t, T>, Exclusion> {
        profile_method!(root_field);

        let first = match set.items.first() {
            Some(first) => first,
            None => return Err(Exclusion::EmptySelectionSet),
        };
        if *self == RootSelection::Single && set.items.len() > 1 {
            return Err(Exclusion::MultipleRootSelections(set.items.len()));
        }
        match first {
            q::Selection::Field(field) => Ok(field),
            q::Selection::FragmentSpread(_) | q::Selection::InlineFragment(_) => {
                Err(Exclusion::RootIsNotField)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_parser::parse_query;

    fn root_name(query: &str, root: RootSelection) -> Result<String, Exclusion> {
        let document = parse_query::<&str>(query).unwrap();
        let sets = subscription_selection_sets(&document);
        assert_eq!(1, sets.len());
        root.root_field(sets[0]).map(|field| field.name.to_string())
    }

    #[test]
    fn only_subscriptions() {
        let query = "
            query a { x }
            subscription b { y }
            mutation c { z }
            { w }
            subscription d { v }
            fragment f on T { u }
        ";
        let document = parse_query::<&str>(query).unwrap();
        let roots = subscription_selection_sets(&document)
            .into_iter()
            .map(|set| RootSelection::First.root_field(set).unwrap().name)
            .collect::<Vec<_>>();
        assert_eq!(vec!["y", "v"], roots);
    }

    #[test]
    fn no_subscriptions() {
        let document = parse_query::<&str>("query { a } mutation { b }").unwrap();
        assert!(subscription_selection_sets(&document).is_empty());
    }

    #[test]
    fn first_ignores_the_rest() {
        assert_eq!(
            Ok("a".to_owned()),
            root_name("subscription { a b ...c }", RootSelection::First)
        );
    }

    #[test]
    fn single_rejects_the_rest() {
        assert_eq!(
            Err(Exclusion::MultipleRootSelections(2)),
            root_name("subscription { a b }", RootSelection::Single)
        );
        assert_eq!(
            Ok("a".to_owned()),
            root_name("subscription { a }", RootSelection::Single)
        );
    }

    #[test]
    fn empty_set() {
        // The parser never produces an empty set, so empty one by hand.
        let document = parse_query::<&str>("subscription { a }").unwrap();
        let mut set = subscription_selection_sets(&document)[0].clone();
        set.items.clear();
        assert_eq!(
            Err(Exclusion::EmptySelectionSet),
            RootSelection::First.root_field(&set).map(|_| ())
        );
    }

    #[test]
    fn fragment_first() {
        assert_eq!(
            Err(Exclusion::RootIsNotField),
            root_name("subscription { ...f a }", RootSelection::First)
        );
        assert_eq!(
            Err(Exclusion::RootIsNotField),
            root_name("subscription { ... on T { a } }", RootSelection::First)
        );
    }
}
