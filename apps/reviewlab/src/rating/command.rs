use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::EvaluateArgs;
use crate::config::Config;
use crate::llm_client::{LlmClient, TextOracle};
use crate::rating::dataset::{load_reviews, sample_reviews};
use crate::rating::prompts::Strategy;
use crate::rating::report::render_comparison_table;
use crate::rating::runner::{BatchRunner, RunnerOptions, StrategyReport};

/// `reviewlab evaluate`: runs every selected strategy and prints the comparison.
pub async fn run(args: EvaluateArgs, config: &Config) -> Result<()> {
    if config.llm.api_key.is_none() {
        warn!("ANTHROPIC_API_KEY is not set; every completion will come back empty");
    }

    let llm = LlmClient::new(config.llm.clone()).context("failed to build LLM client")?;
    info!("LLM client initialized (model: {})", llm.model());

    evaluate(&args, &llm).await?;
    Ok(())
}

/// Loads and samples the dataset, evaluates it against `oracle`, prints the
/// table and writes the optional JSON output.
pub async fn evaluate(args: &EvaluateArgs, oracle: &dyn TextOracle) -> Result<Vec<StrategyReport>> {
    let records = load_reviews(&args.dataset)
        .with_context(|| format!("failed to load dataset {}", args.dataset.display()))?;
    let records = if args.sample_size > 0 {
        sample_reviews(records, args.sample_size, args.seed)
    } else {
        records
    };
    info!("Evaluating {} reviews", records.len());

    let strategies = if args.strategies.is_empty() {
        Strategy::ALL.to_vec()
    } else {
        args.strategies.clone()
    };

    let runner = BatchRunner::new(
        oracle,
        RunnerOptions {
            progress_every: args.progress_every,
            runs: args.runs,
        },
    );
    let reports = runner.run(&strategies, &records).await?;

    println!();
    print!("{}", render_comparison_table(&reports));

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&reports)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write reports to {}", path.display()))?;
        info!("Wrote reports to {}", path.display());
    }

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::Value;

    use super::*;
    use crate::rating::runner::DEFAULT_PROGRESS_EVERY;

    /// Answers every prompt with a fixed rating and records the prompts.
    struct FixedRatingOracle {
        stars: u8,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextOracle for FixedRatingOracle {
        async fn complete(&self, prompt: &str) -> String {
            self.prompts.lock().unwrap().push(prompt.to_string());
            format!(r#"{{"predicted_stars": {}, "explanation": "fixed"}}"#, self.stars)
        }
    }

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn args(dataset: &tempfile::NamedTempFile) -> EvaluateArgs {
        EvaluateArgs {
            dataset: dataset.path().to_path_buf(),
            sample_size: 0,
            seed: 42,
            strategies: Vec::new(),
            runs: 1,
            progress_every: DEFAULT_PROGRESS_EVERY,
            output: None,
        }
    }

    #[tokio::test]
    async fn test_all_strategies_over_full_dataset_with_json_output() {
        let dataset = write_csv("text,stars\nGreat food,4\nAwful,1\nDecent,4\n");
        let out_dir = tempfile::tempdir().unwrap();
        let output = out_dir.path().join("reports.json");
        let oracle = FixedRatingOracle {
            stars: 4,
            prompts: Mutex::new(Vec::new()),
        };

        let mut args = args(&dataset);
        args.output = Some(output.clone());
        let reports = evaluate(&args, &oracle).await.unwrap();

        let order: Vec<Strategy> = reports.iter().map(|r| r.strategy).collect();
        assert_eq!(order, Strategy::ALL.to_vec());
        // sample_size 0 keeps every row, in file order.
        assert_eq!(oracle.prompts.lock().unwrap().len(), 9);
        assert_eq!(reports[0].result.actual_ratings, vec![4, 1, 4]);

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        let written = written.as_array().unwrap();
        assert_eq!(written.len(), 3);
        assert_eq!(written[0]["strategy"], "direct");
        assert_eq!(written[1]["strategy"], "few_shot");
        assert_eq!(written[2]["strategy"], "chain_of_thought");
        assert_eq!(written[1]["result"]["approach_name"], "Few-Shot Learning");
        assert_eq!(written[0]["result"]["total_responses"], 3);
        assert_eq!(written[0]["result"]["valid_predictions_count"], 3);
        assert!((written[0]["result"]["accuracy"].as_f64().unwrap() - 200.0 / 3.0).abs() < 1e-9);
        assert!(written[0]["consistency"].is_null());
    }

    #[tokio::test]
    async fn test_selected_strategy_and_sampling() {
        let rows: String = (0..10).map(|i| format!("review {i},{}\n", i % 5 + 1)).collect();
        let dataset = write_csv(&format!("text,stars\n{rows}"));
        let oracle = FixedRatingOracle {
            stars: 3,
            prompts: Mutex::new(Vec::new()),
        };

        let mut args = args(&dataset);
        args.sample_size = 4;
        args.strategies = vec![Strategy::ChainOfThought];
        let reports = evaluate(&args, &oracle).await.unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].strategy, Strategy::ChainOfThought);
        assert_eq!(reports[0].result.total_responses, 4);
        assert_eq!(oracle.prompts.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_missing_dataset_is_an_error() {
        let dataset = write_csv("");
        let mut args = args(&dataset);
        args.dataset = dataset.path().with_extension("missing");
        let oracle = FixedRatingOracle {
            stars: 1,
            prompts: Mutex::new(Vec::new()),
        };

        let err = evaluate(&args, &oracle).await.unwrap_err();
        assert!(err.to_string().contains("failed to load dataset"));
        assert!(oracle.prompts.lock().unwrap().is_empty());
    }
}
