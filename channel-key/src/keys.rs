use crate::prelude::*;
use itertools::Itertools as _;
use std::fmt;
use std::iter;

/// Joins the segments of a channel key.
pub const SEPARATOR: &str = ":";

/// An argument whose value has been turned into key text.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct ResolvedArgument {
    pub name: String,
    pub value: String,
}

impl ResolvedArgument {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Composes a channel key from a root field and its arguments.
///
/// Implementations receive arguments already sorted by name, so any
/// implementation that only reads them in order is independent of the
/// order in which they were written in the query.
pub trait KeyBuilder {
    fn build(&self, field: &str, args: &[ResolvedArgument]) -> String;
}

/// `field:value1:value2`, values ordered by argument name.
///
/// Names are dropped, so `f(a: "x")` and `f(b: "x")` share the key `f:x`.
/// Values are not escaped either; a value containing `:` can collide with a
/// key that has more arguments.
#[derive(Debug, Default, Copy, Clone)]
pub struct ValuesOnly;

impl KeyBuilder for ValuesOnly {
    fn build(&self, field: &str, args: &[ResolvedArgument]) -> String {
        profile_method!(build);

        iter::once(field)
            .chain(args.iter().map(|arg| arg.value.as_str()))
            .join(SEPARATOR)
    }
}

/// `field:name1=value1:name2=value2`, ordered by argument name.
#[derive(Debug, Default, Copy, Clone)]
pub struct NamedPairs;

impl KeyBuilder for NamedPairs {
    fn build(&self, field: &str, args: &[ResolvedArgument]) -> String {
        profile_method!(build);

        iter::once(field.to_owned())
            .chain(args.iter().map(|arg| format!("{}={}", arg.name, arg.value)))
            .join(SEPARATOR)
    }
}

impl<B: KeyBuilder + ?Sized> KeyBuilder for &'_ B {
    fn build(&self, field: &str, args: &[ResolvedArgument]) -> String {
        (**self).build(field, args)
    }
}

impl<B: KeyBuilder + ?Sized> KeyBuilder for Box<B> {
    fn build(&self, field: &str, args: &[ResolvedArgument]) -> String {
        (**self).build(field, args)
    }
}

/// Sorts `args` by name (ordinal) and hands them to `builder`.
pub fn channel_key(
    builder: &impl KeyBuilder,
    field: &str,
    args: Vec<ResolvedArgument>,
) -> String {
    profile_fn!(channel_key);

    let args = args
        .into_iter()
        .sorted_by(|a, b| a.name.cmp(&b.name))
        .collect::<Vec<_>>();
    builder.build(field, &args)
}

/// The root field of one subscription and the channel it listens on.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct FieldDescriptor {
    field: String,
    channel: String,
}

impl FieldDescriptor {
    pub fn new(field: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            channel: channel.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn into_parts(self) -> (String, String) {
        (self.field, self.channel)
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.channel)
    }
}
