//! Multiple-choice evaluation for visual question benchmarks
//!
//! This crate turns free-form model replies into benchmark numbers:
//!
//! - extract a single choice letter from unconstrained text
//! - score it against ground truth, tagged with per-example categories
//! - aggregate into overall and per-category accuracy
//!
//! Two benchmark variants are provided: counting (four-way choices over up
//! to five agent frames) and perspective (two-way choices over one marked
//! image, with a closer/further and relative-position split).
//!
//! # Example
//!
//! ```
//! use mcq_eval::prelude::*;
//!
//! let records = vec![
//!     EvalRecord::new(
//!         Document::new("How many chairs?", "B")
//!             .with_choices(["A) 1", "B) 2", "C) 3", "D) 4"])
//!             .with_field("difficulty", "easy"),
//!         vec!["(B) two chairs".to_string()],
//!     ),
//! ];
//!
//! let config = ExecutorConfig { seed: Some(0), ..Default::default() };
//! let outcome = Executor::new(Variant::Counting, config).run(&records);
//! assert_eq!(outcome.accuracy, 100.0);
//! ```

pub mod analysis;
pub mod config;
pub mod reporting;
pub mod runner;
pub mod tasks;

pub use config::Config;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::analysis::{
        aggregate, extract_choice, score, CategoryTotals, ChoiceExtractor, ChoiceLabel, ChoiceSet,
        Report, ScoredExample,
    };
    pub use crate::config::Config;
    pub use crate::reporting::{log_report, print_console_report, JsonSummary};
    pub use crate::runner::{Executor, ExecutorConfig, RunOutcome};
    pub use crate::tasks::{
        Axis, Benchmark, Document, EvalRecord, ImageRef, ProcessedResult, PromptOptions, Variant,
    };
}
