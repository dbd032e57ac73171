//! Per-example scoring with category fan-out

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::extractor::ChoiceLabel;
use crate::tasks::literal::parse_list_literal;

/// Reserved key carrying the example's own score
pub const OVERALL_KEY: &str = "overall";

/// Tag value used when a metadata field is absent
pub const UNKNOWN: &str = "unknown";

/// One evaluated example: its 0/1 score plus the same score under every
/// category key the example carries
///
/// Serializes as a flat mapping, e.g.
/// `{"overall": 1.0, "question_type_count": 1.0, "difficulty_easy": 1.0}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredExample {
    pub overall: f64,
    #[serde(flatten)]
    tags: IndexMap<String, f64>,
}

impl ScoredExample {
    pub fn new(overall: f64) -> Self {
        Self {
            overall,
            tags: IndexMap::new(),
        }
    }

    /// Set a category key; `overall` replaces the example score itself
    pub fn insert(&mut self, key: impl Into<String>, score: f64) {
        let key = key.into();
        if key == OVERALL_KEY {
            self.overall = score;
        } else {
            self.tags.insert(key, score);
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, score: f64) -> Self {
        self.insert(key, score);
        self
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        if key == OVERALL_KEY {
            Some(self.overall)
        } else {
            self.tags.get(key).copied()
        }
    }

    /// Category keys other than `overall`, in insertion order
    pub fn tags(&self) -> impl Iterator<Item = (&str, f64)> {
        self.tags.iter().map(|(k, &v)| (k.as_str(), v))
    }

    pub fn is_correct(&self) -> bool {
        self.overall >= 1.0
    }
}

/// Score a prediction and fan the result out over `(axis, value)` tags
///
/// A `None` value is recorded as `unknown` so that the axis is never dropped.
pub fn score<I, A, V>(ground_truth: &str, predicted: ChoiceLabel, tags: I) -> ScoredExample
where
    I: IntoIterator<Item = (A, Option<V>)>,
    A: AsRef<str>,
    V: AsRef<str>,
{
    let value = if predicted.matches(ground_truth.trim()) {
        1.0
    } else {
        0.0
    };

    let mut example = ScoredExample::new(value);
    for (axis, tag) in tags {
        let tag = tag.as_ref().map(|v| v.as_ref()).unwrap_or(UNKNOWN);
        example.insert(format!("{}_{}", axis.as_ref(), tag), value);
    }
    example
}

/// Finer-grained split for a perspective question
///
/// Distance-change questions split on whether the correct option reads
/// "closer" or "further"; relative-position questions use the question type
/// itself. Anything unresolvable is `unknown`.
pub fn derive_split(question_type: &str, ground_truth: &str, answer_choices: Option<&str>) -> String {
    if question_type.contains("distance_change") {
        distance_change_split(ground_truth, answer_choices)
            .unwrap_or(UNKNOWN)
            .to_string()
    } else if question_type.contains("relative_position") {
        question_type.to_string()
    } else {
        UNKNOWN.to_string()
    }
}

fn distance_change_split(ground_truth: &str, answer_choices: Option<&str>) -> Option<&'static str> {
    let raw = answer_choices.unwrap_or_default();
    let choices = match parse_list_literal(raw) {
        Ok(choices) => choices,
        Err(e) => {
            tracing::debug!(error = %e, answer_choices = raw, "Split left unknown");
            return None;
        }
    };

    let index = ground_truth.trim().parse::<ChoiceLabel>().ok()?.index()?;
    let answer = choices.get(index)?.to_lowercase();

    if answer.contains("closer") {
        Some("distance_change_closer")
    } else if answer.contains("further") {
        Some("distance_change_further")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_tags() -> Vec<(&'static str, Option<&'static str>)> {
        Vec::new()
    }

    #[test]
    fn test_binary_score() {
        let a = ChoiceLabel::new('A');
        let b = ChoiceLabel::new('B');
        assert_eq!(score("A", a, no_tags()).overall, 1.0);
        assert_eq!(score("A", b, no_tags()).overall, 0.0);
        assert_eq!(score(" A\n", a, no_tags()).overall, 1.0);
        assert_eq!(score("", a, no_tags()).overall, 0.0);
    }

    #[test]
    fn test_tags_fan_out_same_score() {
        let example = score(
            "C",
            ChoiceLabel::new('C'),
            [
                ("question_type", Some("count_objects")),
                ("difficulty", None),
                ("frames", Some("4")),
            ],
        );

        assert_eq!(example.get(OVERALL_KEY), Some(1.0));
        assert_eq!(example.get("question_type_count_objects"), Some(1.0));
        assert_eq!(example.get("difficulty_unknown"), Some(1.0));
        assert_eq!(example.get("frames_4"), Some(1.0));
        assert_eq!(example.tags().count(), 3);
    }

    #[test]
    fn test_serializes_flat() {
        let example = ScoredExample::new(0.0).with_tag("split_unknown", 0.0);
        let json = serde_json::to_value(&example).unwrap();
        assert_eq!(json, serde_json::json!({"overall": 0.0, "split_unknown": 0.0}));

        let back: ScoredExample = serde_json::from_value(json).unwrap();
        assert_eq!(back, example);
    }

    #[test]
    fn test_insert_overall_does_not_create_tag() {
        let mut example = ScoredExample::new(0.0);
        example.insert(OVERALL_KEY, 1.0);
        assert!(example.is_correct());
        assert_eq!(example.tags().count(), 0);
    }

    #[test]
    fn test_distance_change_split() {
        let choices = Some(r#"["Closer", "Further"]"#);
        assert_eq!(derive_split("distance_change", "A", choices), "distance_change_closer");
        assert_eq!(derive_split("distance_change", "B", choices), "distance_change_further");
        assert_eq!(
            derive_split("distance_change_v2", "B", Some("['much CLOSER', 'FURTHER away']")),
            "distance_change_further"
        );
    }

    #[test]
    fn test_distance_change_soft_failures() {
        let choices = Some(r#"["Closer", "Further"]"#);
        assert_eq!(derive_split("distance_change", "C", choices), UNKNOWN);
        assert_eq!(derive_split("distance_change", "a", choices), UNKNOWN);
        assert_eq!(derive_split("distance_change", "", choices), UNKNOWN);
        assert_eq!(derive_split("distance_change", "A", Some("not a list")), UNKNOWN);
        assert_eq!(derive_split("distance_change", "A", None), UNKNOWN);
        assert_eq!(derive_split("distance_change", "A", Some(r#"["Same"]"#)), UNKNOWN);
    }

    #[test]
    fn test_relative_position_and_other_splits() {
        assert_eq!(
            derive_split("relative_position_left_right", "A", None),
            "relative_position_left_right"
        );
        assert_eq!(derive_split("counting", "A", None), UNKNOWN);
    }
}
