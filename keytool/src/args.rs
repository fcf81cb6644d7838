use channel_key::{KeyBuilder, LiteralPolicy, NamedPairs, Resolver, RootSelection, ValuesOnly};
use structopt::StructOpt;

pub type DynResolver = Resolver<Box<dyn KeyBuilder + Send + Sync>>;

#[derive(StructOpt, Debug)]
pub struct Args {
    /// Load subscription request log file(s). Supports jsonl and gzipped jsonl.
    #[structopt(short, long)]
    pub load_log: Vec<String>,

    /// Take a sample of the request log. Unit interval.
    #[structopt(long, default_value = "1.0")]
    pub sample: f64,

    /// How many of the busiest channels to list in the summary.
    #[structopt(long, default_value = "10")]
    pub top: usize,

    /// A file holding a single subscription request to resolve.
    #[structopt(long, short)]
    pub query: Option<String>,

    /// A file holding the JSON variables for --query.
    #[structopt(long, requires("query"))]
    pub variables: Option<String>,

    /// Also accept float, boolean and enum arguments.
    #[structopt(long)]
    pub extended_literals: bool,

    /// Put argument names into channel keys as name=value.
    #[structopt(long)]
    pub named_pairs: bool,

    /// Exclude subscriptions that select more than one root field.
    #[structopt(long)]
    pub single_root: bool,
}

impl Args {
    pub fn resolver(&self) -> DynResolver {
        let literals = if self.extended_literals {
            LiteralPolicy::Extended
        } else {
            LiteralPolicy::Base
        };
        let root = if self.single_root {
            RootSelection::Single
        } else {
            RootSelection::First
        };
        let builder: Box<dyn KeyBuilder + Send + Sync> = if self.named_pairs {
            Box::new(NamedPairs)
        } else {
            Box::new(ValuesOnly)
        };
        Resolver::new()
            .with_literals(literals)
            .with_root_selection(root)
            .with_builder(builder)
    }
}

pub fn load() -> Args {
    Args::from_args()
}
