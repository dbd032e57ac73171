//! Evaluation run engine

pub mod executor;

pub use executor::{Executor, ExecutorConfig, PreparedPrompt, RunOutcome};
