//! Benchmark documents and the per-variant task surface

pub mod categories;
pub mod counting;
pub mod literal;
pub mod loader;
pub mod perspective;

pub use categories::{Axis, Variant};
pub use counting::CountingBenchmark;
pub use loader::{load_records_from_file, load_records_from_str, LoadError};
pub use perspective::PerspectiveBenchmark;

use indexmap::IndexMap;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::{aggregate, extract_choice, score, ChoiceSet, Report, ScoredExample};
use crate::reporting::log_report;

/// Reference to an image (path or URI); decoding happens elsewhere
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A benchmark question with its ground truth and metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub question: String,
    /// Pre-labelled option lines, e.g. `"A) 3"`
    #[serde(default)]
    pub choices: Option<Vec<String>>,
    #[serde(default)]
    pub answer: String,
    /// Metadata and visual fields, in source order
    #[serde(flatten)]
    pub fields: IndexMap<String, Value>,
}

impl Document {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            choices: None,
            answer: answer.into(),
            fields: IndexMap::new(),
        }
    }

    pub fn with_choices<S: Into<String>>(mut self, choices: impl IntoIterator<Item = S>) -> Self {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Field value, treating `null` as absent
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).filter(|v| !v.is_null())
    }

    /// Field rendered as text: strings verbatim, other values as JSON
    pub fn text(&self, name: &str) -> Option<String> {
        self.field(name).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    pub fn image(&self, name: &str) -> Option<ImageRef> {
        self.field(name).map(|value| match value {
            Value::String(s) => ImageRef(s.clone()),
            Value::Object(obj) => obj
                .get("path")
                .and_then(Value::as_str)
                .map(|p| ImageRef(p.to_string()))
                .unwrap_or_else(|| ImageRef(value.to_string())),
            other => ImageRef(other.to_string()),
        })
    }
}

/// A document paired with the model outputs generated for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalRecord {
    pub doc: Document,
    #[serde(default)]
    pub results: Vec<String>,
}

impl EvalRecord {
    pub fn new(doc: Document, results: Vec<String>) -> Self {
        Self { doc, results }
    }
}

/// Prompt customization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptOptions {
    /// Appended verbatim after the question and choices
    #[serde(default)]
    pub post_prompt: Option<String>,
}

impl PromptOptions {
    pub fn with_post_prompt(post_prompt: impl Into<String>) -> Self {
        Self {
            post_prompt: Some(post_prompt.into()),
        }
    }

    pub(crate) fn apply(&self, body: String) -> String {
        match &self.post_prompt {
            Some(post) => body + post,
            None => body,
        }
    }
}

/// What results-processing hands back to the harness
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedResult {
    pub accuracy: ScoredExample,
}

/// The first model output, whitespace-trimmed; empty when there is none
pub fn first_response(results: &[String]) -> &str {
    results.first().map(|r| r.trim()).unwrap_or("")
}

/// Functions a benchmark variant exposes to the evaluation harness
pub trait Benchmark: Send + Sync {
    fn variant(&self) -> Variant;

    /// Labels a response may resolve to
    fn choices(&self) -> ChoiceSet;

    /// Images to present, in order
    fn doc_to_visual(&self, doc: &Document) -> Vec<ImageRef>;

    /// Final prompt text
    fn doc_to_text(&self, doc: &Document, options: &PromptOptions) -> String;

    /// `(axis, value)` pairs the example is reported under
    fn category_tags(&self, doc: &Document) -> Vec<(Axis, Option<String>)>;

    fn process_results(
        &self,
        doc: &Document,
        results: &[String],
        rng: &mut dyn RngCore,
    ) -> ProcessedResult {
        let predicted = extract_choice(first_response(results), &self.choices(), rng);
        let tags = self
            .category_tags(doc)
            .into_iter()
            .map(|(axis, value)| (axis.as_str(), value));

        ProcessedResult {
            accuracy: score(&doc.answer, predicted, tags),
        }
    }

    fn report(&self, results: &[ScoredExample]) -> Report {
        aggregate(results)
    }

    /// Log the breakdown and return the rounded overall accuracy
    fn aggregate_results(&self, results: &[ScoredExample]) -> f64 {
        let report = self.report(results);
        log_report(self.variant().title(), &report);
        report.rounded_overall()
    }
}

impl Variant {
    pub fn benchmark(&self) -> Box<dyn Benchmark> {
        match self {
            Variant::Counting => Box::new(CountingBenchmark),
            Variant::Perspective => Box::new(PerspectiveBenchmark),
        }
    }
}
