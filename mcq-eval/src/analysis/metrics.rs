//! Accuracy aggregation over scored examples

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::scoring::ScoredExample;
use crate::tasks::Axis;

/// Running correct/total pair for one category
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    pub correct: f64,
    pub total: u64,
}

impl Tally {
    pub fn record(&mut self, score: f64) {
        self.correct += score;
        self.total += 1;
    }

    pub fn merge(&mut self, other: Tally) {
        self.correct += other.correct;
        self.total += other.total;
    }

    /// Percentage in `0..=100`; an empty tally reads `0.0`
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct / self.total as f64 * 100.0
        }
    }

    /// Correct count as shown in reports
    pub fn correct_count(&self) -> u64 {
        self.correct.max(0.0) as u64
    }
}

/// Per-category accumulation for one aggregation pass
///
/// Accumulation is a plain sum, so totals built from any ordering or any
/// partition of the examples (combined with [`CategoryTotals::merge`]) agree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTotals {
    overall: Tally,
    categories: BTreeMap<String, Tally>,
}

impl CategoryTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, example: &ScoredExample) {
        self.overall.record(example.overall);
        for (key, score) in example.tags() {
            self.categories
                .entry(key.to_string())
                .or_default()
                .record(score);
        }
    }

    pub fn merge(&mut self, other: CategoryTotals) {
        self.overall.merge(other.overall);
        for (key, tally) in other.categories {
            self.categories.entry(key).or_default().merge(tally);
        }
    }

    pub fn overall(&self) -> Tally {
        self.overall
    }

    pub fn category(&self, key: &str) -> Option<Tally> {
        self.categories.get(key).copied()
    }

    pub fn into_report(self) -> Report {
        let categories = self
            .categories
            .into_iter()
            .filter(|(_, tally)| tally.total > 0)
            .map(|(key, tally)| {
                let entry = CategoryAccuracy {
                    accuracy: tally.accuracy(),
                    correct: tally.correct,
                    total: tally.total,
                };
                (key, entry)
            })
            .collect();

        Report {
            overall: self.overall,
            overall_accuracy: self.overall.accuracy(),
            categories,
        }
    }
}

impl<'a> Extend<&'a ScoredExample> for CategoryTotals {
    fn extend<T: IntoIterator<Item = &'a ScoredExample>>(&mut self, iter: T) {
        for example in iter {
            self.add(example);
        }
    }
}

impl<'a> FromIterator<&'a ScoredExample> for CategoryTotals {
    fn from_iter<T: IntoIterator<Item = &'a ScoredExample>>(iter: T) -> Self {
        let mut totals = CategoryTotals::new();
        totals.extend(iter);
        totals
    }
}

/// Accuracy for one category key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAccuracy {
    pub accuracy: f64,
    pub correct: f64,
    pub total: u64,
}

/// Final accuracy breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub overall: Tally,
    pub overall_accuracy: f64,
    pub categories: BTreeMap<String, CategoryAccuracy>,
}

/// One row of a report section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionEntry {
    /// Category value with the axis prefix removed
    pub name: String,
    pub key: String,
    pub accuracy: f64,
    pub correct: f64,
    pub total: u64,
}

/// Category entries sharing an axis; `axis` is `None` for unrecognized prefixes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    pub axis: Option<Axis>,
    pub entries: Vec<SectionEntry>,
}

impl ReportSection {
    pub fn heading(&self) -> &'static str {
        self.axis.map(|a| a.heading()).unwrap_or("Other Categories:")
    }
}

impl Report {
    /// Overall accuracy rounded to 5 decimal places
    pub fn rounded_overall(&self) -> f64 {
        round_to(self.overall_accuracy, 5)
    }

    pub fn category(&self, key: &str) -> Option<&CategoryAccuracy> {
        self.categories.get(key)
    }

    /// Non-empty sections in canonical axis order, unrecognized keys last;
    /// entries within a section are sorted by full key
    pub fn sections(&self) -> Vec<ReportSection> {
        let mut grouped: BTreeMap<Option<Axis>, Vec<SectionEntry>> = BTreeMap::new();

        // BTreeMap iteration is already sorted by full key
        for (key, entry) in &self.categories {
            let (axis, name) = match Axis::from_key(key) {
                Some((axis, value)) => (Some(axis), value),
                None => (None, key.as_str()),
            };
            grouped.entry(axis).or_default().push(SectionEntry {
                name: name.to_string(),
                key: key.clone(),
                accuracy: entry.accuracy,
                correct: entry.correct,
                total: entry.total,
            });
        }

        let mut sections: Vec<ReportSection> = Axis::all()
            .into_iter()
            .filter_map(|axis| {
                grouped
                    .remove(&Some(axis))
                    .map(|entries| ReportSection { axis: Some(axis), entries })
            })
            .collect();

        if let Some(entries) = grouped.remove(&None) {
            sections.push(ReportSection { axis: None, entries });
        }

        sections
    }
}

/// Aggregate scored examples into a report
pub fn aggregate<'a>(examples: impl IntoIterator<Item = &'a ScoredExample>) -> Report {
    examples
        .into_iter()
        .collect::<CategoryTotals>()
        .into_report()
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example(overall: f64, tags: &[&str]) -> ScoredExample {
        tags.iter()
            .fold(ScoredExample::new(overall), |ex, key| ex.with_tag(*key, overall))
    }

    #[test]
    fn test_all_correct() {
        let examples: Vec<_> = (0..10).map(|_| example(1.0, &[])).collect();
        let report = aggregate(&examples);
        assert_eq!(report.rounded_overall(), 100.0);
        assert_eq!(report.overall.total, 10);
    }

    #[test]
    fn test_half_correct() {
        let examples = vec![
            example(1.0, &[]),
            example(1.0, &[]),
            example(0.0, &[]),
            example(0.0, &[]),
        ];
        assert_eq!(aggregate(&examples).rounded_overall(), 50.0);
    }

    #[test]
    fn test_empty_input_is_zero() {
        let report = aggregate(&Vec::<ScoredExample>::new());
        assert_eq!(report.overall_accuracy, 0.0);
        assert!(report.categories.is_empty());
        assert!(report.sections().is_empty());
    }

    #[test]
    fn test_category_uses_own_denominator() {
        let mut examples: Vec<_> = (0..8).map(|_| example(0.0, &["frames_3"])).collect();
        examples.push(example(1.0, &["frames_5"]));
        examples.push(example(0.0, &["frames_5"]));

        let report = aggregate(&examples);
        let five = report.category("frames_5").unwrap();
        assert_eq!(five.total, 2);
        assert_eq!(five.accuracy, 50.0);
        assert_eq!(report.category("frames_3").unwrap().total, 8);
        assert_eq!(report.overall.total, 10);
        assert_eq!(report.overall_accuracy, 10.0);
    }

    #[test]
    fn test_rounding_to_five_places() {
        let examples = vec![example(1.0, &[]), example(0.0, &[]), example(0.0, &[])];
        assert_eq!(aggregate(&examples).rounded_overall(), 33.33333);
    }

    #[test]
    fn test_sections_grouped_and_sorted() {
        let examples = vec![
            example(1.0, &["split_unknown", "question_type_b", "difficulty_hard"]),
            example(0.0, &["question_type_a", "difficulty_easy", "lighting_dim"]),
        ];
        let sections = aggregate(&examples).sections();

        let axes: Vec<_> = sections.iter().map(|s| s.axis).collect();
        assert_eq!(
            axes,
            vec![
                Some(Axis::QuestionType),
                Some(Axis::Difficulty),
                Some(Axis::Split),
                None
            ]
        );

        let names: Vec<_> = sections[0].entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(sections[3].heading(), "Other Categories:");
        assert_eq!(sections[3].entries[0].name, "lighting_dim");
    }

    #[test]
    fn test_merge_matches_single_pass() {
        let examples = vec![
            example(1.0, &["difficulty_easy"]),
            example(0.0, &["difficulty_easy", "movement_rotate"]),
            example(1.0, &["movement_rotate"]),
        ];

        let mut left: CategoryTotals = examples[..1].iter().collect();
        let right: CategoryTotals = examples[1..].iter().collect();
        left.merge(right);

        let whole: CategoryTotals = examples.iter().collect();
        assert_eq!(left, whole);
        assert_eq!(whole.category("movement_rotate").map(|t| t.total), Some(2));
    }
}
