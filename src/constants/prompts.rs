pub const SYSTEM_PROMPT: &str = "You are an expert educator helping analyze content. Provide detailed, structured responses. Follow the requested block labels exactly, keep one item per line, and never add introductions or closing remarks.";

pub const TRUNCATION_MARKER: &str = " [truncated]";

pub const TEXT_OPEN_DELIMITER: &str = "TEXT:\n\"\"\"";
pub const TEXT_CLOSE_DELIMITER: &str = "\"\"\"";

pub const QUESTIONS_TASK: &str = "Generate Socratic questions about the text below. Ask questions that make a learner clarify the ideas, examine the assumptions behind them, and reason about their consequences. Write 2-3 open-ended questions per block; never answer them.";

pub const EXPLANATIONS_TASK: &str = "Explain the text below at four levels of expertise. The basic level uses everyday language and no jargon; the intermediate level introduces the key terminology; the advanced level covers mechanisms and relationships between ideas; the expert level discusses theory, limitations and open problems. Write 1-3 sentences per level.";

pub const PRACTICE_TASK: &str = "Create practice questions with varying difficulty based on the text below. Multiple-choice questions list their options on indented lines as a), b), c), d) and name the correct option on a final indented line starting with 'Answer:'. Short-answer questions can be answered in one or two sentences. Discussion questions require an extended argument.";

pub const KEY_TERMS_TASK: &str = "Extract the 5-10 most important terms from the text below. Write exactly one term per line in the form 'Term: definition', with definitions grounded in how the text uses the term.";

pub const SUMMARY_TASK: &str = "Summarize the text below. First list its main points, then synthesize how they connect to each other and to the overall argument.";

pub const BLOOMS_TASK: &str = "Create questions for each level of Bloom's taxonomy based on the text below. Remember questions recall facts; Understand questions explain ideas; Apply questions use ideas in new situations; Analyze questions draw connections; Evaluate questions justify a position; Create questions produce new work. Write 1-2 questions per level.";

pub const ANALOGIES_TASK: &str = "Create 3-5 analogies that explain the concepts in the text below to a newcomer. Write one analogy per line, naming the concept first, then what it is like and why the comparison holds.";

pub const CHAIN_OF_THOUGHT_TASK: &str = "Reason step by step about the central concept of the text below. Define it, place it in context, break it into components, examine its implications and integrate it with the other ideas in the text. Write 1-3 short lines per step.";

pub const SEVEN_HATS_TASK: &str = "Analyze the text below with de Bono's thinking hats. White Hat: facts and information. Red Hat: feelings and intuitions. Black Hat: risks and critical judgment. Yellow Hat: benefits and positive aspects. Green Hat: creative alternatives. Blue Hat: process and overview. Write 2-3 points per hat.";

pub const FORMAT_HEADER: &str = "FORMAT REQUIREMENTS:";

pub const FORMAT_LABELED_BLOCKS: &str = "- Start each block with its label on its own line, exactly as written here:";

pub const FORMAT_ITEMS: &str = "- Write one item per line and start every item with \"- \". Indent sub-items by two spaces.";

pub const FORMAT_FINAL_OUTPUT: &str = "- After the last block, write \"FINAL OUTPUT:\" on its own line followed by a concise, self-contained conclusion.";

pub const FORMAT_NO_PREAMBLE: &str = "- Do not add any introduction, commentary or closing remarks.";
