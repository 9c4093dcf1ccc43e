// Rating prediction evaluator.
// Compares prompting strategies for star-rating classification via the shared TextOracle.

pub mod command;
pub mod dataset;
pub mod metrics;
pub mod parser;
pub mod prompts;
pub mod report;
pub mod runner;
