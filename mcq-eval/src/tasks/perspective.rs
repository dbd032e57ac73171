//! Perspective benchmark: one marked image, two-way choices

use super::literal::parse_list_literal;
use super::{Axis, Benchmark, Document, ImageRef, PromptOptions, Variant};
use crate::analysis::{derive_split, ChoiceLabel, ChoiceSet, UNKNOWN};

#[derive(Debug, Clone, Copy, Default)]
pub struct PerspectiveBenchmark;

impl PerspectiveBenchmark {
    /// `answer_choices` re-labelled as `A) ...`, `B) ...`, or the raw text
    /// when it does not parse
    fn format_choices(&self, doc: &Document) -> String {
        let raw = doc.text("answer_choices").unwrap_or_default();
        match parse_list_literal(&raw) {
            Ok(choices) => choices
                .iter()
                .enumerate()
                .map(|(idx, choice)| match ChoiceLabel::from_index(idx) {
                    Some(label) => format!("{}) {}", label, choice),
                    None => choice.clone(),
                })
                .collect::<Vec<_>>()
                .join("\n"),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse answer_choices: {}", raw);
                raw
            }
        }
    }
}

impl Benchmark for PerspectiveBenchmark {
    fn variant(&self) -> Variant {
        Variant::Perspective
    }

    fn choices(&self) -> ChoiceSet {
        ChoiceSet::two_way()
    }

    /// Only the marked first-person image; the new-perspective image is withheld
    fn doc_to_visual(&self, doc: &Document) -> Vec<ImageRef> {
        match doc.image("marked_image") {
            Some(image) => vec![image],
            None => {
                tracing::warn!("marked_image is missing from document");
                Vec::new()
            }
        }
    }

    fn doc_to_text(&self, doc: &Document, options: &PromptOptions) -> String {
        let body = format!("{}\n{}", doc.question.trim(), self.format_choices(doc));
        options.apply(body)
    }

    fn category_tags(&self, doc: &Document) -> Vec<(Axis, Option<String>)> {
        let question_type = doc.text("question_type");
        let split = derive_split(
            question_type.as_deref().unwrap_or(UNKNOWN),
            doc.answer.trim(),
            doc.text("answer_choices").as_deref(),
        );

        vec![
            (Axis::QuestionType, question_type),
            (Axis::Split, Some(split)),
        ]
    }
}
