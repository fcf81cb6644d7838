use crate::args::DynResolver;
use crate::contest::Contest;
use channel_key::{Exclusion, FieldDescriptor, RequestError};
use num_format::{Locale, ToFormattedString as _};
use rayon::prelude::*;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::fmt;

const EXAMPLES_PER_BUCKET: usize = 4;

/// One recorded subscription request.
#[derive(Deserialize, PartialEq, Eq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub query: String,
    /// Logs store variables either as JSON text or inline as a JSON value.
    #[serde(default, deserialize_with = "variables_text")]
    pub variables: String,
}

fn variables_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value: serde_json::Value = Deserialize::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(text) => text,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[derive(Default)]
pub struct SubscriptionSummary {
    requests: usize,
    descriptors: usize,
    channels: HashMap<String, usize>,
    failures: HashMap<&'static str, FailureBucket>,
}

fn fail_name(err: &RequestError) -> &'static str {
    match err {
        RequestError::FailedToParseQuery => "Failed to parse query",
        RequestError::FailedToParseVariables => "Failed to parse variables",
    }
}

pub struct FailureBucket {
    count: usize,
    examples: Contest<Request>,
}

impl FailureBucket {
    pub fn new(capacity: usize) -> Self {
        Self {
            count: 0,
            examples: Contest::new(capacity),
        }
    }

    fn insert(&mut self, request: Request) {
        self.examples
            .insert_unique(example_score(&request), request, same_query)
    }

    fn merge(&mut self, other: FailureBucket) {
        self.count += other.count;
        for example in other.examples.take() {
            self.insert(example);
        }
    }
}

/// Shorter requests make better examples.
fn example_score(request: &Request) -> usize {
    // Does not underflow because that would imply going over the memory limit
    usize::MAX - request.query.len() - request.variables.len()
}

// Variables are meant to differ between requests of the same shape.
fn same_query(a: &Request, b: &Request) -> bool {
    a.query == b.query
}

pub struct ResolvedRequest {
    outcome: Result<Vec<Result<FieldDescriptor, Exclusion>>, RequestError>,
    request: Request,
}

impl SubscriptionSummary {
    fn add(&mut self, resolved: ResolvedRequest) {
        self.requests += 1;
        let outcomes = match resolved.outcome {
            Ok(outcomes) => outcomes,
            Err(e) => {
                self.fail(fail_name(&e), resolved.request);
                return;
            }
        };
        for outcome in outcomes {
            match outcome {
                Ok(descriptor) => {
                    self.descriptors += 1;
                    let (_, channel) = descriptor.into_parts();
                    *self.channels.entry(channel).or_insert(0) += 1;
                }
                Err(exclusion) => self.fail(exclusion.name(), resolved.request.clone()),
            }
        }
    }

    fn fail(&mut self, name: &'static str, request: Request) {
        let bucket = self.failure_bucket(name);
        bucket.count += 1;
        bucket.insert(request);
    }

    pub fn merge(mut self, mut other: Self) -> Self {
        self.requests += other.requests;
        self.descriptors += other.descriptors;
        for (channel, count) in other.channels.drain() {
            *self.channels.entry(channel).or_insert(0) += count;
        }
        for (name, bucket) in other.failures.drain() {
            self.failure_bucket(name).merge(bucket);
        }
        self
    }

    fn failure_bucket(&mut self, name: &'static str) -> &mut FailureBucket {
        self.failures
            .entry(name)
            .or_insert_with(|| FailureBucket::new(EXAMPLES_PER_BUCKET))
    }

    pub fn requests(&self) -> usize {
        self.requests
    }

    pub fn descriptors(&self) -> usize {
        self.descriptors
    }

    /// The `n` channels with the most subscribers, busiest first.
    pub fn top_channels(&self, n: usize) -> Vec<(&str, usize)> {
        let mut channels = self
            .channels
            .iter()
            .map(|(channel, count)| (channel.as_str(), *count))
            .collect::<Vec<_>>();
        channels.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        channels.truncate(n);
        channels
    }

    pub fn report(&self, top: usize) -> Report<'_> {
        Report { summary: self, top }
    }
}

pub struct Report<'a> {
    summary: &'a SubscriptionSummary,
    top: usize,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.summary;
        writeln!(
            f,
            "Requests: {}",
            summary.requests().to_formatted_string(&Locale::en)
        )?;
        writeln!(
            f,
            "Subscriptions: {}",
            summary.descriptors().to_formatted_string(&Locale::en)
        )?;
        writeln!(
            f,
            "Distinct channels: {}",
            summary.channels.len().to_formatted_string(&Locale::en)
        )?;

        writeln!(f)?;
        writeln!(f, "Busiest channels:")?;
        for (channel, count) in summary.top_channels(self.top) {
            writeln!(f, "\t{:>10} {}", count.to_formatted_string(&Locale::en), channel)?;
        }

        writeln!(f)?;
        writeln!(
            f,
            "Failures: {}",
            summary
                .failures
                .values()
                .map(|bucket| bucket.count)
                .sum::<usize>()
                .to_formatted_string(&Locale::en)
        )?;
        let mut names = summary.failures.keys().collect::<Vec<_>>();
        names.sort_unstable();
        for name in names {
            let bucket = &summary.failures[name];
            writeln!(
                f,
                "\t{:?} count: {}",
                name,
                bucket.count.to_formatted_string(&Locale::en)
            )?;
            for example in bucket.examples.iter() {
                writeln!(
                    f,
                    "\t\t{} | variables: {}",
                    example.query.split_whitespace().collect::<Vec<_>>().join(" "),
                    &example.variables
                )?;
            }
        }

        Ok(())
    }
}

fn resolve_one(resolver: &DynResolver, request: Request) -> ResolvedRequest {
    let outcome = resolver.analyze_request(&request.query, &request.variables);
    ResolvedRequest { outcome, request }
}

pub fn resolve_many(resolver: &DynResolver, requests: Vec<Request>) -> SubscriptionSummary {
    requests
        .into_par_iter()
        .map(|request| resolve_one(resolver, request))
        .fold(SubscriptionSummary::default, |mut acc, value| {
            acc.add(value);
            acc
        })
        .reduce(SubscriptionSummary::default, SubscriptionSummary::merge)
}
