use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::rating::prompts::Strategy;
use crate::rating::runner::DEFAULT_PROGRESS_EVERY;

#[derive(Parser, Debug)]
#[command(
    name = "reviewlab",
    version,
    about = "Review rating prompt evaluation and review feedback API"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare prompting strategies for star-rating prediction.
    Evaluate(EvaluateArgs),
    /// Run the review feedback HTTP API.
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    /// CSV file with a `text`/`review` column and a `stars`/`rating` column.
    #[arg(long, default_value = "data/yelp_reviews_sample.csv")]
    pub dataset: PathBuf,

    /// Reviews to sample from the dataset. 0 evaluates every review.
    #[arg(long, default_value_t = 200)]
    pub sample_size: usize,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Strategy to evaluate; repeat to compare several. Defaults to all.
    #[arg(long = "strategy", value_enum)]
    pub strategies: Vec<Strategy>,

    /// Passes per strategy; more than one reports consistency.
    #[arg(long, default_value_t = 1)]
    pub runs: usize,

    #[arg(long, default_value_t = DEFAULT_PROGRESS_EVERY)]
    pub progress_every: usize,

    /// Also write the reports as JSON to this path.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Overrides the PORT environment variable.
    #[arg(long)]
    pub port: Option<u16>,
}
