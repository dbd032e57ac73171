//! Counting benchmark: up to five agent frames, four-way choices

use super::{Axis, Benchmark, Document, ImageRef, PromptOptions, Variant};
use crate::analysis::ChoiceSet;

/// Number of agent frame slots (`frame_0` .. `frame_4`)
pub const FRAME_SLOTS: usize = 5;

#[derive(Debug, Clone, Copy, Default)]
pub struct CountingBenchmark;

impl Benchmark for CountingBenchmark {
    fn variant(&self) -> Variant {
        Variant::Counting
    }

    fn choices(&self) -> ChoiceSet {
        ChoiceSet::four_way()
    }

    /// Every present agent frame; the top-down map is never shown
    fn doc_to_visual(&self, doc: &Document) -> Vec<ImageRef> {
        (0..FRAME_SLOTS)
            .filter_map(|i| doc.image(&format!("frame_{}", i)))
            .collect()
    }

    fn doc_to_text(&self, doc: &Document, options: &PromptOptions) -> String {
        let question = doc.question.trim();
        let body = match doc.choices.as_deref() {
            Some(choices) if !choices.is_empty() => {
                format!("{}\n{}", question, choices.join("\n"))
            }
            _ => question.to_string(),
        };
        options.apply(body)
    }

    fn category_tags(&self, doc: &Document) -> Vec<(Axis, Option<String>)> {
        vec![
            (Axis::QuestionType, doc.text("question_type")),
            (Axis::Difficulty, doc.text("difficulty")),
            (Axis::Movement, doc.text("movement_type")),
            (Axis::Frames, doc.text("total_frames")),
        ]
    }
}
