mod args;
mod contest;
mod errors;
mod log_loader;
mod request_loader;
mod runner;

use anyhow::Result;
use args::DynResolver;

const CHUNK_SIZE_HINT: usize = 262144;

/// Replays subscription requests through the channel key resolver. This can...
/// * Resolve a single request from a query file and a variables file
/// * Load request logs in jsonl and/or gzipped jsonl format, resolve every
///   request and report how subscriptions spread over channels
/// For usage details, see the command-line help
fn main() -> Result<()> {
    let args = args::load();
    let resolver = args.resolver();

    if let Some(query) = &args.query {
        resolve_single(&resolver, query, args.variables.as_deref())?;
    }

    if !args.load_log.is_empty() {
        resolve_logs(&resolver, &args.load_log, args.sample, args.top)?;
    }

    Ok(())
}

fn resolve_single(resolver: &DynResolver, query: &str, variables: Option<&str>) -> Result<()> {
    let (query, variables) = request_loader::load(query, variables)?;
    for outcome in resolver.analyze_request(&query, &variables)? {
        match outcome {
            Ok(descriptor) => println!("{}\t{}", descriptor.field(), descriptor.channel()),
            Err(exclusion) => eprintln!("Excluded: {}", exclusion),
        }
    }
    Ok(())
}

fn resolve_logs(resolver: &DynResolver, logs: &[String], sample: f64, top: usize) -> Result<()> {
    let mut result: runner::SubscriptionSummary = Default::default();
    for chunk in log_loader::load_all_chunks::<runner::Request>(logs, sample) {
        let update = runner::resolve_many(resolver, chunk?);
        result = result.merge(update);
    }

    println!("{}", result.report(top));
    Ok(())
}
