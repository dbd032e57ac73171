//! Response parsing, scoring and aggregation

pub mod extractor;
pub mod metrics;
pub mod scoring;

pub use extractor::{
    extract_choice, find_choice, ChoiceExtractor, ChoiceLabel, ChoiceSet, ChoiceSetError,
};
pub use metrics::{
    aggregate, round_to, CategoryAccuracy, CategoryTotals, Report, ReportSection, SectionEntry,
    Tally,
};
pub use scoring::{derive_split, score, ScoredExample, OVERALL_KEY, UNKNOWN};
