//! Benchmark variants and category axes

use serde::{Deserialize, Serialize};

/// Which benchmark family a document set belongs to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Object counting across up to five agent frames
    #[default]
    Counting,
    /// Viewpoint reasoning from a single marked image
    Perspective,
}

impl Variant {
    pub fn all() -> Vec<Variant> {
        vec![Variant::Counting, Variant::Perspective]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Counting => "counting",
            Variant::Perspective => "perspective",
        }
    }

    /// Heading used for the aggregation report
    pub fn title(&self) -> &'static str {
        match self {
            Variant::Counting => "AI2-THOR Counting 400 Evaluation Results",
            Variant::Perspective => "AI2-THOR Perspective 411 Evaluation Results",
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "counting" | "counting_400" | "ai2thor_counting_400" => Ok(Variant::Counting),
            "perspective" | "perspective_411" | "ai2thor_perspective_411" => {
                Ok(Variant::Perspective)
            }
            _ => Err(format!("Unknown variant: {}", s)),
        }
    }
}

/// A breakdown dimension; category keys are `<axis>_<value>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    QuestionType,
    Difficulty,
    Movement,
    Frames,
    Split,
}

impl Axis {
    /// Canonical report order
    pub fn all() -> [Axis; 5] {
        [
            Axis::QuestionType,
            Axis::Difficulty,
            Axis::Movement,
            Axis::Frames,
            Axis::Split,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::QuestionType => "question_type",
            Axis::Difficulty => "difficulty",
            Axis::Movement => "movement",
            Axis::Frames => "frames",
            Axis::Split => "split",
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            Axis::QuestionType => "By Question Type:",
            Axis::Difficulty => "By Difficulty:",
            Axis::Movement => "By Movement Type:",
            Axis::Frames => "By Number of Frames:",
            Axis::Split => "By Split:",
        }
    }

    /// Category key for a value on this axis
    pub fn key(&self, value: &str) -> String {
        format!("{}_{}", self.as_str(), value)
    }

    /// Split a category key into its axis and value, if the prefix is known
    pub fn from_key(key: &str) -> Option<(Axis, &str)> {
        Axis::all().into_iter().find_map(|axis| {
            key.strip_prefix(axis.as_str())
                .and_then(|rest| rest.strip_prefix('_'))
                .map(|value| (axis, value))
        })
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "question_type" => Ok(Axis::QuestionType),
            "difficulty" => Ok(Axis::Difficulty),
            "movement" | "movement_type" => Ok(Axis::Movement),
            "frames" | "total_frames" => Ok(Axis::Frames),
            "split" => Ok(Axis::Split),
            _ => Err(format!("Unknown axis: {}", s)),
        }
    }
}
