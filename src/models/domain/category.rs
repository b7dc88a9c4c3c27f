use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Kind of study artifact the service can generate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Questions,
    Explanations,
    Practice,
    KeyTerms,
    Summary,
    Blooms,
    Analogies,
    ChainOfThought,
    SevenHats,
}

/// How a category's normalized output is laid out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputShape {
    /// Ordered lines, section headers kept inline.
    Lines,
    /// Lines bucketed under fixed level keys.
    Levels,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Questions,
        Category::Explanations,
        Category::Practice,
        Category::KeyTerms,
        Category::Summary,
        Category::Blooms,
        Category::Analogies,
        Category::ChainOfThought,
        Category::SevenHats,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Questions => "questions",
            Category::Explanations => "explanations",
            Category::Practice => "practice",
            Category::KeyTerms => "key_terms",
            Category::Summary => "summary",
            Category::Blooms => "blooms",
            Category::Analogies => "analogies",
            Category::ChainOfThought => "chain_of_thought",
            Category::SevenHats => "seven_hats",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Category::Questions => "Socratic questions",
            Category::Explanations => "Multi-level explanations",
            Category::Practice => "Practice questions",
            Category::KeyTerms => "Key terms",
            Category::Summary => "Summary",
            Category::Blooms => "Bloom's taxonomy questions",
            Category::Analogies => "Analogies",
            Category::ChainOfThought => "Chain of thought",
            Category::SevenHats => "Seven thinking hats",
        }
    }

    pub fn shape(self) -> OutputShape {
        match self {
            Category::Explanations | Category::Blooms | Category::SevenHats => OutputShape::Levels,
            Category::Questions
            | Category::Practice
            | Category::KeyTerms
            | Category::Summary
            | Category::Analogies
            | Category::ChainOfThought => OutputShape::Lines,
        }
    }

    /// Sub-step titles the prompt asks the model to label its blocks with.
    /// `Lines` categories get `STEP n:` markers, `Levels` categories `LEVEL n:`.
    pub fn outline(self) -> &'static [&'static str] {
        match self {
            Category::Questions => &["Clarifying Questions", "Probing Assumptions", "Implications"],
            Category::Explanations => &["Basic", "Intermediate", "Advanced", "Expert"],
            Category::Practice => &["Multiple Choice", "Short Answer", "Discussion"],
            Category::KeyTerms => &[],
            Category::Summary => &["Main Points", "Synthesis"],
            Category::Blooms => &["Remember", "Understand", "Apply", "Analyze", "Evaluate", "Create"],
            Category::Analogies => &[],
            Category::ChainOfThought => &[
                "Define",
                "Contextualize",
                "Analyze Components",
                "Examine Implications",
                "Integrate",
            ],
            Category::SevenHats => &[
                "White Hat",
                "Red Hat",
                "Black Hat",
                "Yellow Hat",
                "Green Hat",
                "Blue Hat",
            ],
        }
    }

    /// Keys of a `Levels` category, in presentation order. Empty for `Lines`.
    pub fn level_keys(self) -> &'static [&'static str] {
        match self {
            Category::Explanations => &["basic", "intermediate", "advanced", "expert"],
            Category::Blooms => &["remember", "understand", "apply", "analyze", "evaluate", "create"],
            Category::SevenHats => &["white", "red", "black", "yellow", "green", "blue"],
            Category::Questions
            | Category::Practice
            | Category::KeyTerms
            | Category::Summary
            | Category::Analogies
            | Category::ChainOfThought => &[],
        }
    }

    /// Whether the prompt asks for a terminal `FINAL OUTPUT:` block.
    pub fn wants_final_output(self) -> bool {
        matches!(self, Category::ChainOfThought | Category::Summary)
    }

    /// Resolves a category from its identifier or one of the legacy method names.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_lowercase().replace(['-', ' '], "_");
        let category = match normalized.as_str() {
            "questions" | "socratic" | "socratic_questions" => Category::Questions,
            "explanations" | "multilevel" | "multi_level" => Category::Explanations,
            "practice" | "practice_questions" => Category::Practice,
            "key_terms" | "keyterms" | "terms" => Category::KeyTerms,
            "summary" | "summarizer" => Category::Summary,
            "blooms" | "bloom" | "blooms_taxonomy" => Category::Blooms,
            "analogies" | "analogy" => Category::Analogies,
            "chain_of_thought" | "cot" => Category::ChainOfThought,
            "seven_hats" | "seven_hat" | "six_hats" | "thinking_hats" => Category::SevenHats,
            _ => return None,
        };
        Some(category)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::from_name(s)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown category '{}'", s.trim())))
    }
}
