//! Content served when generation fails for a category.
//!
//! Users see these lines whenever the upstream model is unreachable or its
//! output cannot be parsed, so each entry is written as usable study material.

use crate::models::domain::{Category, StructuredContent};

pub const GENERIC_FALLBACK: &str =
    "Study content could not be generated for this request. Re-read the text and write down its main idea in one sentence.";

const QUESTIONS: &[&str] = &[
    "What is the central claim of this text, and how would you state it in your own words?",
    "What assumptions does the text rely on, and are they justified?",
    "What evidence would change your view of the main argument?",
    "How would the conclusions change if they were applied in a different context?",
];

const PRACTICE: &[&str] = &[
    "Multiple choice: Which statement best captures the main idea of the text?",
    "Short answer: In two sentences, explain the most important concept in the text.",
    "Discussion: Evaluate the strongest and the weakest point of the text's argument.",
];

const KEY_TERMS: &[&str] = &[
    "Main concept: The central idea the text is built around; restate it in one sentence.",
    "Supporting term: A word the text uses to explain the main concept; look up its precise meaning.",
    "Context term: A word whose meaning depends on the field the text belongs to; note how the text uses it.",
];

const SUMMARY: &[&str] = &[
    "Read the text once for its main claim before looking at details.",
    "List the two or three pieces of evidence the text offers for that claim.",
    "Write a short summary that connects the main claim to its conclusion.",
];

const ANALOGIES: &[&str] = &[
    "The main idea works like a map: it shows how the parts of the topic connect without being the territory itself.",
    "The process described is like a recipe: each step depends on the ones completed before it.",
    "The supporting details act like the beams of a bridge: remove one and the argument becomes less stable.",
];

const CHAIN_OF_THOUGHT: &[&str] = &[
    "STEP 1: Define",
    "Name the central concept of the text and state what it means.",
    "STEP 2: Contextualize",
    "Place the concept within the broader topic the text discusses.",
    "STEP 3: Analyze Components",
    "Break the concept into its parts and describe what each part does.",
    "STEP 4: Examine Implications",
    "Ask what follows if the concept holds, and what follows if it does not.",
    "STEP 5: Integrate",
    "Connect the concept to the other ideas in the text.",
];

const EXPLANATIONS: &[(&str, &[&str])] = &[
    (
        "basic",
        &["At its most basic level, the text introduces a main idea and the reasons it matters."],
    ),
    (
        "intermediate",
        &["At an intermediate level, the text shows how its key components interact and influence each other."],
    ),
    (
        "advanced",
        &["At an advanced level, the text reveals relationships and systemic effects between its ideas, including trade-offs."],
    ),
    (
        "expert",
        &["At an expert level, the text invites critical analysis of its theoretical framework, its limitations and open questions."],
    ),
];

const BLOOMS: &[(&str, &[&str])] = &[
    ("remember", &["Define the main concept of the text in your own words."]),
    ("understand", &["Explain how the main concept works, using an example from the text."]),
    ("apply", &["How would you use the main concept to solve a problem outside the text?"]),
    ("analyze", &["Compare and contrast two ideas from the text. How are they related?"]),
    ("evaluate", &["Assess how convincing the text's argument is. What would strengthen it?"]),
    ("create", &["Design a new example or experiment that tests the main concept."]),
];

const SEVEN_HATS: &[(&str, &[&str])] = &[
    ("white", &["Which facts and data points does the text present?"]),
    ("red", &["What is your first emotional reaction to the text, and why?"]),
    ("black", &["Which claims lack sufficient supporting evidence, and what are the risks?"]),
    ("yellow", &["What benefits or valuable insights does the text offer?"]),
    ("green", &["What alternative approach or new idea does the text suggest?"]),
    ("blue", &["What should be explored next, and how would you organize that inquiry?"]),
];

fn lines(entries: &[&str]) -> StructuredContent {
    StructuredContent::Lines(entries.iter().map(|line| line.to_string()).collect())
}

fn levels(entries: &[(&str, &[&str])]) -> StructuredContent {
    StructuredContent::Levels(
        entries
            .iter()
            .map(|(key, lines)| {
                (
                    key.to_string(),
                    lines.iter().map(|line| line.to_string()).collect(),
                )
            })
            .collect(),
    )
}

/// Fallback content for `category`, in that category's output shape.
pub fn default_for(category: Category) -> StructuredContent {
    match category {
        Category::Questions => lines(QUESTIONS),
        Category::Explanations => levels(EXPLANATIONS),
        Category::Practice => lines(PRACTICE),
        Category::KeyTerms => lines(KEY_TERMS),
        Category::Summary => lines(SUMMARY),
        Category::Blooms => levels(BLOOMS),
        Category::Analogies => lines(ANALOGIES),
        Category::ChainOfThought => lines(CHAIN_OF_THOUGHT),
        Category::SevenHats => levels(SEVEN_HATS),
    }
}

/// Like [`default_for`], for a category given by name; unknown names get the
/// generic fallback line.
pub fn default_for_name(name: &str) -> StructuredContent {
    match Category::from_name(name) {
        Some(category) => default_for(category),
        None => StructuredContent::Lines(vec![GENERIC_FALLBACK.to_string()]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::OutputShape;

    #[test]
    fn every_category_has_non_empty_default() {
        for category in Category::ALL {
            let content = default_for(category);
            assert!(!content.is_empty(), "{} default is empty", category);
        }
    }

    #[test]
    fn defaults_match_category_shape() {
        for category in Category::ALL {
            assert_eq!(default_for(category).shape(), category.shape());
        }
    }

    #[test]
    fn level_defaults_cover_every_level_with_lines() {
        for category in Category::ALL {
            if category.shape() != OutputShape::Levels {
                continue;
            }
            let content = default_for(category);
            assert_eq!(content.level_keys(), category.level_keys().to_vec());
            for key in category.level_keys() {
                assert!(content.level(key).is_some_and(|lines| !lines.is_empty()));
            }
        }
    }

    #[test]
    fn unknown_name_gets_generic_fallback() {
        assert_eq!(
            default_for_name("interpretive_dance"),
            StructuredContent::Lines(vec![GENERIC_FALLBACK.to_string()])
        );
        assert_eq!(default_for_name("socratic"), default_for(Category::Questions));
    }
}
