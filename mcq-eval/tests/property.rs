//! Property-based tests for extraction and aggregation using proptest

use proptest::prelude::*;

use mcq_eval::analysis::{
    aggregate, extract_choice, find_choice, CategoryTotals, ChoiceLabel, ChoiceSet, ScoredExample,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

// =========================================================================
// Strategies
// =========================================================================

/// A scored example with 0-3 tags drawn from a small key space
fn arb_example() -> impl Strategy<Value = ScoredExample> {
    let keys = prop::sample::subsequence(
        vec![
            "question_type_count",
            "question_type_compare",
            "difficulty_easy",
            "difficulty_hard",
            "frames_3",
            "frames_5",
            "split_unknown",
        ],
        0..=3,
    );
    (any::<bool>(), keys).prop_map(|(correct, keys)| {
        let score = if correct { 1.0 } else { 0.0 };
        keys.into_iter()
            .fold(ScoredExample::new(score), |ex, key| ex.with_tag(key, score))
    })
}

/// Filler text that never forms a label pattern for upper-case letters
fn arb_filler() -> impl Strategy<Value = String> {
    "[a-z ]{0,40}"
}

// =========================================================================
// Property: aggregation ignores order and partitioning
// =========================================================================

proptest! {
    #[test]
    fn aggregation_is_order_independent(
        examples in prop::collection::vec(arb_example(), 0..40),
        seed in any::<u64>(),
    ) {
        use rand::seq::SliceRandom;

        let mut shuffled = examples.clone();
        shuffled.shuffle(&mut StdRng::seed_from_u64(seed));

        prop_assert_eq!(aggregate(&examples), aggregate(&shuffled));
    }

    #[test]
    fn split_accumulation_matches_single_pass(
        examples in prop::collection::vec(arb_example(), 0..40),
        cut in 0usize..40,
    ) {
        let cut = cut.min(examples.len());
        let mut left: CategoryTotals = examples[..cut].iter().collect();
        left.merge(examples[cut..].iter().collect());

        let whole: CategoryTotals = examples.iter().collect();
        prop_assert_eq!(left, whole);
    }

    #[test]
    fn category_totals_never_exceed_overall(
        examples in prop::collection::vec(arb_example(), 1..40),
    ) {
        let report = aggregate(&examples);
        for entry in report.categories.values() {
            prop_assert!(entry.total <= report.overall.total);
            prop_assert!(entry.accuracy >= 0.0 && entry.accuracy <= 100.0);
        }
    }
}

// =========================================================================
// Property: extraction
// =========================================================================

proptest! {
    #[test]
    fn extraction_always_returns_member(
        response in ".{0,60}",
        width in 1u8..=6,
        seed in any::<u64>(),
    ) {
        let choices = ChoiceSet::letters(width).unwrap();
        let label = extract_choice(&response, &choices, &mut StdRng::seed_from_u64(seed));
        prop_assert!(choices.contains(label));
    }

    #[test]
    fn single_parenthesized_label_wins(
        prefix in arb_filler(),
        suffix in arb_filler(),
        index in 0usize..4,
    ) {
        let choices = ChoiceSet::four_way();
        let label = ChoiceLabel::from_index(index).unwrap();
        let response = format!("{}({}){}", prefix, label, suffix);

        prop_assert_eq!(find_choice(&response, &choices), Some(label));
    }

    #[test]
    fn last_spaced_mention_wins(
        filler in "[a-z]{1,10}",
        first in 0usize..4,
        second in 0usize..4,
    ) {
        prop_assume!(first != second);
        let choices = ChoiceSet::four_way();
        let a = ChoiceLabel::from_index(first).unwrap();
        let b = ChoiceLabel::from_index(second).unwrap();
        let response = format!("maybe {} {} actually {}", a, filler, b);

        prop_assert_eq!(find_choice(&response, &choices), Some(b));
    }
}
