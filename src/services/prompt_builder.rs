use crate::constants::prompts::{
    ANALOGIES_TASK, BLOOMS_TASK, CHAIN_OF_THOUGHT_TASK, EXPLANATIONS_TASK, FORMAT_FINAL_OUTPUT,
    FORMAT_HEADER, FORMAT_ITEMS, FORMAT_LABELED_BLOCKS, FORMAT_NO_PREAMBLE, KEY_TERMS_TASK,
    PRACTICE_TASK, QUESTIONS_TASK, SEVEN_HATS_TASK, SUMMARY_TASK, TEXT_CLOSE_DELIMITER,
    TEXT_OPEN_DELIMITER, TRUNCATION_MARKER,
};
use crate::models::domain::{Category, OutputShape, PromptSpec};

/// Collapses whitespace runs to single spaces, trims, and cuts to `max_chars`
/// characters with a truncation marker appended.
pub fn preprocess_text(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    match collapsed.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            let mut truncated = collapsed[..cut].trim_end().to_string();
            truncated.push_str(TRUNCATION_MARKER);
            truncated
        }
        None => collapsed,
    }
}

fn task_for(category: Category) -> &'static str {
    match category {
        Category::Questions => QUESTIONS_TASK,
        Category::Explanations => EXPLANATIONS_TASK,
        Category::Practice => PRACTICE_TASK,
        Category::KeyTerms => KEY_TERMS_TASK,
        Category::Summary => SUMMARY_TASK,
        Category::Blooms => BLOOMS_TASK,
        Category::Analogies => ANALOGIES_TASK,
        Category::ChainOfThought => CHAIN_OF_THOUGHT_TASK,
        Category::SevenHats => SEVEN_HATS_TASK,
    }
}

/// Block labels exactly as the model is asked to reproduce them.
pub fn outline_labels(category: Category) -> Vec<String> {
    let marker = match category.shape() {
        OutputShape::Lines => "STEP",
        OutputShape::Levels => "LEVEL",
    };

    category
        .outline()
        .iter()
        .enumerate()
        .map(|(index, title)| format!("{} {}: {}", marker, index + 1, title))
        .collect()
}

/// Builds the instruction for `category` around already-preprocessed text.
/// Deterministic: the same inputs always yield the same prompt.
pub fn build_prompt(category: Category, text: &str) -> PromptSpec {
    let labels = outline_labels(category);

    let mut instruction = String::with_capacity(text.len() + 1024);
    instruction.push_str(task_for(category));
    instruction.push_str("\n\n");
    instruction.push_str(FORMAT_HEADER);
    instruction.push('\n');

    if !labels.is_empty() {
        instruction.push_str(FORMAT_LABELED_BLOCKS);
        instruction.push('\n');
        for label in &labels {
            instruction.push_str(label);
            instruction.push('\n');
        }
    }
    instruction.push_str(FORMAT_ITEMS);
    instruction.push('\n');
    if category.wants_final_output() {
        instruction.push_str(FORMAT_FINAL_OUTPUT);
        instruction.push('\n');
    }
    instruction.push_str(FORMAT_NO_PREAMBLE);
    instruction.push_str("\n\n");

    instruction.push_str(TEXT_OPEN_DELIMITER);
    instruction.push('\n');
    instruction.push_str(text);
    instruction.push('\n');
    instruction.push_str(TEXT_CLOSE_DELIMITER);

    PromptSpec {
        category,
        instruction,
        outline: (!labels.is_empty()).then_some(labels),
    }
}
