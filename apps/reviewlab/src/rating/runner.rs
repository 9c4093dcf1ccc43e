//! Batch Runner — drives prompt → oracle → parser → metrics for each strategy.
//!
//! Oracle calls are awaited one at a time, in dataset order.

use serde::Serialize;
use tracing::{debug, info};

use crate::llm_client::TextOracle;
use crate::rating::dataset::ReviewRecord;
use crate::rating::metrics::{consistency, evaluate_approach, ApproachResult, MetricsError};
use crate::rating::prompts::{build_prompt, Strategy};

pub const DEFAULT_PROGRESS_EVERY: usize = 20;

#[derive(Debug, Clone, Copy)]
pub struct RunnerOptions {
    /// Log progress after this many items. Zero disables progress logging.
    pub progress_every: usize,
    /// Passes per strategy. More than one enables the consistency metric.
    pub runs: usize,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            progress_every: DEFAULT_PROGRESS_EVERY,
            runs: 1,
        }
    }
}

/// Result of one strategy: the first pass's evaluation plus, when several
/// passes ran, the agreement between them.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyReport {
    pub strategy: Strategy,
    pub result: ApproachResult,
    pub consistency: Option<f64>,
}

pub struct BatchRunner<'a> {
    oracle: &'a dyn TextOracle,
    options: RunnerOptions,
}

impl<'a> BatchRunner<'a> {
    pub fn new(oracle: &'a dyn TextOracle, options: RunnerOptions) -> Self {
        Self { oracle, options }
    }

    /// Evaluates every strategy in order over the same records.
    pub async fn run(
        &self,
        strategies: &[Strategy],
        records: &[ReviewRecord],
    ) -> Result<Vec<StrategyReport>, MetricsError> {
        let mut reports = Vec::with_capacity(strategies.len());
        for &strategy in strategies {
            reports.push(self.evaluate_strategy(strategy, records).await?);
        }
        Ok(reports)
    }

    pub async fn evaluate_strategy(
        &self,
        strategy: Strategy,
        records: &[ReviewRecord],
    ) -> Result<StrategyReport, MetricsError> {
        let actual_ratings: Vec<u8> = records.iter().map(|r| r.actual_rating).collect();
        let runs = self.options.runs.max(1);

        let result = self
            .single_pass(strategy, records, &actual_ratings, 1, runs)
            .await?;
        let mut prediction_runs = Vec::with_capacity(runs);
        prediction_runs.push(result.predictions.clone());

        for pass in 2..=runs {
            let repeat = self
                .single_pass(strategy, records, &actual_ratings, pass, runs)
                .await?;
            prediction_runs.push(repeat.predictions);
        }

        Ok(StrategyReport {
            strategy,
            result,
            consistency: (runs > 1).then(|| consistency(&prediction_runs)),
        })
    }

    async fn single_pass(
        &self,
        strategy: Strategy,
        records: &[ReviewRecord],
        actual_ratings: &[u8],
        pass: usize,
        runs: usize,
    ) -> Result<ApproachResult, MetricsError> {
        info!(
            "Evaluating {} approach (pass {pass}/{runs})...",
            strategy.approach_name()
        );
        let responses = self.collect_responses(strategy, records).await;
        evaluate_approach(strategy.approach_name(), &responses, actual_ratings)
    }

    async fn collect_responses(&self, strategy: Strategy, records: &[ReviewRecord]) -> Vec<String> {
        let total = records.len();
        let mut responses = Vec::with_capacity(total);

        for (idx, record) in records.iter().enumerate() {
            let prompt = build_prompt(strategy, &record.text);
            let response = self.oracle.complete(&prompt).await;
            debug!("Item {idx}: {} bytes of response", response.len());
            responses.push(response);

            let done = idx + 1;
            if self.options.progress_every > 0 && done % self.options.progress_every == 0 {
                info!("Processed {done}/{total} reviews...");
            }
        }

        responses
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// Replays scripted responses in order, then returns "".
    struct ScriptedOracle {
        responses: Mutex<VecDeque<String>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedOracle {
        fn new(responses: &[&str]) -> Self {
            Self {
                responses: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextOracle for ScriptedOracle {
        async fn complete(&self, prompt: &str) -> String {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.responses.lock().unwrap().pop_front().unwrap_or_default()
        }
    }

    fn records(ratings: &[u8]) -> Vec<ReviewRecord> {
        ratings
            .iter()
            .enumerate()
            .map(|(i, &r)| ReviewRecord {
                text: format!("review number {i}"),
                actual_rating: r,
            })
            .collect()
    }

    fn stars(r: u8) -> String {
        format!(r#"{{"predicted_stars": {r}, "explanation": "scripted"}}"#)
    }

    #[tokio::test]
    async fn test_single_strategy_metrics() {
        let responses = [stars(5), "garbled".to_string(), stars(2)];
        let refs: Vec<&str> = responses.iter().map(String::as_str).collect();
        let oracle = ScriptedOracle::new(&refs);
        let runner = BatchRunner::new(&oracle, RunnerOptions::default());

        let report = runner
            .evaluate_strategy(Strategy::Direct, &records(&[5, 4, 3]))
            .await
            .unwrap();

        assert_eq!(report.result.approach_name, "Direct Classification");
        assert_eq!(report.result.total_responses, 3);
        assert_eq!(report.result.valid_predictions_count, 2);
        assert!((report.result.accuracy - 50.0).abs() < 1e-9);
        assert!((report.result.json_validity_rate - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(report.result.predictions, vec![Some(5), None, Some(2)]);
        assert_eq!(report.consistency, None);
    }

    #[tokio::test]
    async fn test_prompts_follow_dataset_order() {
        let oracle = ScriptedOracle::new(&[]);
        let runner = BatchRunner::new(&oracle, RunnerOptions::default());
        runner
            .run(&[Strategy::FewShot], &records(&[1, 2]))
            .await
            .unwrap();

        let prompts = oracle.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains("review number 0"));
        assert!(prompts[1].contains("review number 1"));
        assert_eq!(prompts[0], build_prompt(Strategy::FewShot, "review number 0"));
    }

    #[tokio::test]
    async fn test_failing_oracle_still_produces_reports() {
        let oracle = ScriptedOracle::new(&[]);
        let runner = BatchRunner::new(&oracle, RunnerOptions::default());

        let reports = runner
            .run(&Strategy::ALL, &records(&[1, 2, 3, 4]))
            .await
            .unwrap();

        assert_eq!(reports.len(), 3);
        for report in &reports {
            assert_eq!(report.result.accuracy, 0.0);
            assert_eq!(report.result.json_validity_rate, 0.0);
            assert_eq!(report.result.valid_predictions_count, 0);
            assert_eq!(report.result.total_responses, 4);
        }
        assert_eq!(reports[2].strategy, Strategy::ChainOfThought);
    }

    #[tokio::test]
    async fn test_multiple_passes_report_consistency() {
        // Pass 1 then pass 2 over two items.
        let responses = [stars(4), stars(1), stars(4), stars(2)];
        let refs: Vec<&str> = responses.iter().map(String::as_str).collect();
        let oracle = ScriptedOracle::new(&refs);
        let runner = BatchRunner::new(
            &oracle,
            RunnerOptions {
                progress_every: 1,
                runs: 2,
            },
        );

        let report = runner
            .evaluate_strategy(Strategy::ChainOfThought, &records(&[4, 1]))
            .await
            .unwrap();

        assert_eq!(report.result.predictions, vec![Some(4), Some(1)]);
        assert!((report.result.accuracy - 100.0).abs() < 1e-9);
        assert_eq!(report.consistency, Some(50.0));
    }

    #[tokio::test]
    async fn test_empty_dataset() {
        let oracle = ScriptedOracle::new(&[]);
        let runner = BatchRunner::new(&oracle, RunnerOptions::default());
        let report = runner.evaluate_strategy(Strategy::Direct, &[]).await.unwrap();
        assert_eq!(report.result.total_responses, 0);
        assert_eq!(report.result.accuracy, 0.0);
        assert!(oracle.prompts.lock().unwrap().is_empty());
    }
}
