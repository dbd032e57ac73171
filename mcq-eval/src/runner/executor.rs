//! Sequential executor scoring model results for a record set

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::analysis::{CategoryTotals, Report, ScoredExample};
use crate::reporting::log_report;
use crate::tasks::{Benchmark, EvalRecord, ImageRef, ProcessedResult, PromptOptions, Variant};

/// Configuration for the executor
#[derive(Debug, Clone, Default)]
pub struct ExecutorConfig {
    /// Seed for the no-match fallback; `None` draws from entropy
    pub seed: Option<u64>,
    pub prompt: PromptOptions,
}

/// Everything produced by one run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub scored: Vec<ScoredExample>,
    pub report: Report,
    /// Rounded overall accuracy, as returned by aggregation
    pub accuracy: f64,
}

/// Prompt and visuals prepared for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedPrompt {
    pub index: usize,
    pub text: String,
    pub images: Vec<ImageRef>,
}

/// Executor for scoring benchmark records
pub struct Executor {
    config: ExecutorConfig,
    benchmark: Box<dyn Benchmark>,
    rng: StdRng,
}

impl Executor {
    pub fn new(variant: Variant, config: ExecutorConfig) -> Self {
        Self::with_benchmark(variant.benchmark(), config)
    }

    pub fn with_benchmark(benchmark: Box<dyn Benchmark>, config: ExecutorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            benchmark,
            rng,
        }
    }

    pub fn variant(&self) -> Variant {
        self.benchmark.variant()
    }

    /// Score a single record
    pub fn process(&mut self, record: &EvalRecord) -> ProcessedResult {
        self.benchmark
            .process_results(&record.doc, &record.results, &mut self.rng)
    }

    /// Score every record, then aggregate and log the breakdown
    pub fn run(&mut self, records: &[EvalRecord]) -> RunOutcome {
        let mut totals = CategoryTotals::new();
        let mut scored = Vec::with_capacity(records.len());

        for (idx, record) in records.iter().enumerate() {
            let result = self.process(record);
            tracing::debug!(
                index = idx,
                correct = result.accuracy.is_correct(),
                "Scored record"
            );
            totals.add(&result.accuracy);
            scored.push(result.accuracy);
        }

        let report = totals.into_report();
        log_report(self.variant().title(), &report);
        let accuracy = report.rounded_overall();

        RunOutcome {
            scored,
            report,
            accuracy,
        }
    }

    /// Prompt text and selected images for every record
    pub fn prepare_prompts(&self, records: &[EvalRecord]) -> Vec<PreparedPrompt> {
        records
            .iter()
            .enumerate()
            .map(|(index, record)| PreparedPrompt {
                index,
                text: self.benchmark.doc_to_text(&record.doc, &self.config.prompt),
                images: self.benchmark.doc_to_visual(&record.doc),
            })
            .collect()
    }
}
