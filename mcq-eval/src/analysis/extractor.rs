//! Choice-letter extraction from free-form model responses

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Punctuation trimmed from both ends of a response before matching
const TRIM_CHARS: &[char] = &[',', '.', '!', '?', ';', ':', '\''];

/// A single multiple-choice option label, e.g. `A`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChoiceLabel(char);

impl ChoiceLabel {
    pub fn new(symbol: char) -> Self {
        Self(symbol)
    }

    pub fn symbol(&self) -> char {
        self.0
    }

    /// Label for a zero-based option position (`0` is `A`)
    pub fn from_index(index: usize) -> Option<Self> {
        let offset = u32::try_from(index).ok()?;
        ('A' as u32)
            .checked_add(offset)
            .and_then(char::from_u32)
            .map(Self)
    }

    /// Zero-based option position of this label (`A` is `0`)
    pub fn index(&self) -> Option<usize> {
        (self.0 as u32)
            .checked_sub('A' as u32)
            .map(|offset| offset as usize)
    }

    /// Exact comparison against a ground-truth answer string
    pub fn matches(&self, answer: &str) -> bool {
        let mut chars = answer.chars();
        chars.next() == Some(self.0) && chars.next().is_none()
    }
}

impl fmt::Display for ChoiceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ChoiceLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(ChoiceLabel(c)),
            _ => Err(format!("Not a single-symbol choice label: {:?}", s)),
        }
    }
}

/// Errors building a [`ChoiceSet`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChoiceSetError {
    #[error("choice set must contain at least one label")]
    Empty,

    #[error("duplicate choice label: {0}")]
    Duplicate(ChoiceLabel),
}

/// Ordered, non-empty set of valid labels for one question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceSet {
    labels: Vec<ChoiceLabel>,
}

impl ChoiceSet {
    pub fn new(labels: impl IntoIterator<Item = ChoiceLabel>) -> Result<Self, ChoiceSetError> {
        let mut collected: Vec<ChoiceLabel> = Vec::new();
        for label in labels {
            if collected.contains(&label) {
                return Err(ChoiceSetError::Duplicate(label));
            }
            collected.push(label);
        }
        if collected.is_empty() {
            return Err(ChoiceSetError::Empty);
        }
        Ok(Self { labels: collected })
    }

    /// The first `count` letters of the alphabet, starting at `A`
    pub fn letters(count: u8) -> Result<Self, ChoiceSetError> {
        Self::new((0..count as usize).filter_map(ChoiceLabel::from_index))
    }

    /// `{A, B, C, D}`
    pub fn four_way() -> Self {
        Self::alphabet("ABCD")
    }

    /// `{A, B}`
    pub fn two_way() -> Self {
        Self::alphabet("AB")
    }

    fn alphabet(symbols: &str) -> Self {
        Self {
            labels: symbols.chars().map(ChoiceLabel).collect(),
        }
    }

    pub fn labels(&self) -> &[ChoiceLabel] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn contains(&self, label: ChoiceLabel) -> bool {
        self.labels.contains(&label)
    }
}

/// Substring forms tried in order; the first form with any hit decides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchLayer {
    /// `(A)`
    Parenthesized,
    /// ` A `
    Spaced,
    /// `A.`
    Period,
    /// `A)`
    ClosingParen,
}

impl MatchLayer {
    const ORDER: [MatchLayer; 4] = [
        MatchLayer::Parenthesized,
        MatchLayer::Spaced,
        MatchLayer::Period,
        MatchLayer::ClosingParen,
    ];

    fn pattern(self, label: ChoiceLabel) -> String {
        match self {
            MatchLayer::Parenthesized => format!("({})", label),
            MatchLayer::Spaced => format!(" {} ", label),
            MatchLayer::Period => format!("{}.", label),
            MatchLayer::ClosingParen => format!("{})", label),
        }
    }

    fn candidates(self, text: &str, choices: &ChoiceSet) -> Vec<ChoiceLabel> {
        choices
            .labels()
            .iter()
            .copied()
            .filter(|&label| text.contains(&self.pattern(label)))
            .collect()
    }
}

/// Strip edge punctuation and pad with one space on each side
fn normalize(response: &str) -> String {
    format!(" {} ", response.trim_matches(TRIM_CHARS))
}

/// Deterministic part of extraction; `None` when the response names no label
pub fn find_choice(response: &str, choices: &ChoiceSet) -> Option<ChoiceLabel> {
    let text = normalize(response);

    let candidates = MatchLayer::ORDER
        .iter()
        .map(|layer| layer.candidates(&text, choices))
        .find(|found| !found.is_empty())?;

    if let [only] = candidates.as_slice() {
        return Some(*only);
    }

    // Last space-delimited mention wins; a label never mentioned that way ranks
    // below every found position, and equal ranks keep the earlier label.
    let mut best: Option<(Option<usize>, ChoiceLabel)> = None;
    for label in candidates {
        let position = text.rfind(&MatchLayer::Spaced.pattern(label));
        match best {
            Some((best_position, _)) if position <= best_position => {}
            _ => best = Some((position, label)),
        }
    }
    best.map(|(_, label)| label)
}

/// Resolve a response to exactly one label, drawing from `rng` when the text
/// carries no usable signal
pub fn extract_choice<R: Rng + ?Sized>(
    response: &str,
    choices: &ChoiceSet,
    rng: &mut R,
) -> ChoiceLabel {
    if let Some(label) = find_choice(response, choices) {
        return label;
    }

    let label = choices.labels[rng.gen_range(0..choices.len())];
    tracing::debug!(label = %label, "No choice found in response, picked at random");
    label
}

/// Stateful extractor owning its random source
///
/// Seed it for reproducible runs:
///
/// ```
/// use mcq_eval::analysis::{ChoiceExtractor, ChoiceSet};
///
/// let mut extractor = ChoiceExtractor::seeded(7);
/// let label = extractor.extract("Maybe A but actually B", &ChoiceSet::two_way());
/// assert_eq!(label.to_string(), "B");
/// ```
#[derive(Debug, Clone)]
pub struct ChoiceExtractor<R = StdRng> {
    rng: R,
}

impl<R: Rng> ChoiceExtractor<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn extract(&mut self, response: &str, choices: &ChoiceSet) -> ChoiceLabel {
        extract_choice(response, choices, &mut self.rng)
    }
}

impl ChoiceExtractor<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(c: char) -> ChoiceLabel {
        ChoiceLabel::new(c)
    }

    #[test]
    fn test_parenthesized_label() {
        let choices = ChoiceSet::four_way();
        assert_eq!(find_choice("(B) because the chair is closer", &choices), Some(label('B')));
    }

    #[test]
    fn test_parenthesized_beats_spaced() {
        // " A " is present but layer one already matched
        let choices = ChoiceSet::four_way();
        assert_eq!(find_choice("A is wrong, (C) is right", &choices), Some(label('C')));
    }

    #[test]
    fn test_last_spaced_mention_wins() {
        let choices = ChoiceSet::two_way();
        assert_eq!(find_choice("Maybe A but actually B", &choices), Some(label('B')));
        assert_eq!(find_choice("Maybe B but actually A", &choices), Some(label('A')));
    }

    #[test]
    fn test_trailing_punctuation_stripped() {
        let choices = ChoiceSet::four_way();
        assert_eq!(find_choice("The answer is D.", &choices), Some(label('D')));
        assert_eq!(find_choice("C!?", &choices), Some(label('C')));
        assert_eq!(find_choice("'B'", &choices), Some(label('B')));
    }

    #[test]
    fn test_period_and_closing_paren_layers() {
        let choices = ChoiceSet::four_way();
        assert_eq!(find_choice("Answer:C.\nDone", &choices), Some(label('C')));
        assert_eq!(find_choice("Answer:B)", &choices), Some(label('B')));
    }

    #[test]
    fn test_no_spaced_mention_prefers_alphabet_order() {
        let choices = ChoiceSet::four_way();
        assert_eq!(find_choice("(D) or (B)", &choices), Some(label('B')));
    }

    #[test]
    fn test_spaced_mention_outranks_missing_one() {
        let choices = ChoiceSet::four_way();
        // Both parenthesized; only C also appears space-delimited
        assert_eq!(find_choice("(A) vs (C), final: C ok", &choices), Some(label('C')));
    }

    #[test]
    fn test_lowercase_is_not_a_label() {
        let choices = ChoiceSet::four_way();
        assert_eq!(find_choice("I am not sure", &choices), None);
        assert_eq!(find_choice("", &choices), None);
    }

    #[test]
    fn test_random_fallback_is_member_and_reproducible() {
        let choices = ChoiceSet::four_way();
        let mut first = ChoiceExtractor::seeded(42);
        let mut second = ChoiceExtractor::seeded(42);
        for _ in 0..20 {
            let a = first.extract("I am not sure", &choices);
            let b = second.extract("I am not sure", &choices);
            assert!(choices.contains(a));
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_choice_set_construction() {
        assert_eq!(ChoiceSet::letters(0), Err(ChoiceSetError::Empty));
        assert_eq!(ChoiceSet::letters(4).unwrap(), ChoiceSet::four_way());
        assert_eq!(
            ChoiceSet::new([label('A'), label('A')]),
            Err(ChoiceSetError::Duplicate(label('A')))
        );
    }

    #[test]
    fn test_label_index_round_trip() {
        assert_eq!(ChoiceLabel::from_index(1), Some(label('B')));
        assert_eq!(label('C').index(), Some(2));
        assert_eq!(label('!').index(), None);
        assert!(label('A').matches("A"));
        assert!(!label('A').matches("AB"));
        assert!("AB".parse::<ChoiceLabel>().is_err());
    }
}
