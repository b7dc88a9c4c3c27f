//! Turns free-form model output into [`StructuredContent`].
//!
//! The text is split into sections on line-start markers (markdown headings,
//! `STEP n` / `LEVEL n` labels, bold-only lines, and the level labels of the
//! category). Body lines lose their bullet or numbering prefix and are
//! re-indented at two spaces per nesting level. A `FINAL OUTPUT:` marker opens
//! a trailing section that swallows the rest of the text. Anything that parses
//! to nothing is replaced by the category default, so the result is never
//! empty.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::AppError;
use crate::models::domain::{Category, OutputShape, StructuredContent};
use crate::services::default_results::default_for;

pub const FINAL_OUTPUT_TITLE: &str = "Final Output";
pub const FINAL_OUTPUT_KEY: &str = "final_output";
pub const OVERVIEW_KEY: &str = "overview";

const TAB_WIDTH: usize = 4;

static MARKDOWN_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#{1,6}\s+\S").expect("MARKDOWN_HEADING is a valid regex pattern")
});

static NUMBERED_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:\*\*)?\s*(?:step|level|part|section|stage)\s+\d+\s*(?:[:.)\-–—]|\*\*|$)")
        .expect("NUMBERED_LABEL is a valid regex pattern")
});

static BOLD_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\*\*(?P<title>[^*]+?)\*\*\s*:?\s*$").expect("BOLD_LINE is a valid regex pattern")
});

static FINAL_OUTPUT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:\*\*)?\s*(?:final\s+output|final\s+answer|output)\s*:\s*(?:\*\*)?\s*(?P<rest>.*)$")
        .expect("FINAL_OUTPUT is a valid regex pattern")
});

static BULLET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[-*+•‣▪◦]|\d{1,3}[.)])(?:\s+|$)").expect("BULLET is a valid regex pattern")
});

/// Normalizes `raw` for `category`. Absent, blank or unparseable input yields
/// the category default.
pub fn normalize(raw: Option<&str>, category: Category) -> StructuredContent {
    let Some(raw) = raw.filter(|text| !text.trim().is_empty()) else {
        log::debug!("No completion text for {}, using default content", category);
        return default_for(category);
    };

    let sections = split_sections(raw, category);
    let content = match category.shape() {
        OutputShape::Lines => flatten(sections),
        OutputShape::Levels => bucket(sections, category),
    };

    if content.is_empty() {
        log::warn!(
            "{}",
            AppError::NormalizationEmpty(format!(
                "{} response ({} chars) had no usable lines, using default content",
                category,
                raw.len()
            ))
        );
        return default_for(category);
    }

    content
}

#[derive(Debug)]
struct Section {
    title: Option<String>,
    key: Option<&'static str>,
    lines: Vec<String>,
    indents: Vec<usize>,
}

impl Section {
    fn new(title: Option<String>, key: Option<&'static str>) -> Self {
        Self {
            title,
            key,
            lines: Vec::new(),
            indents: Vec::new(),
        }
    }

    /// Adds a physical body line, stripping its bullet and mapping its
    /// indentation onto a depth relative to the section's shallower lines.
    fn push_body(&mut self, physical: &str) {
        let width = indent_width(physical);
        let content = strip_bullet(physical.trim()).trim();
        if content.is_empty() {
            return;
        }

        while self.indents.last().is_some_and(|&top| top > width) {
            self.indents.pop();
        }
        if self.indents.last() != Some(&width) {
            self.indents.push(width);
        }
        let depth = self.indents.len() - 1;

        self.lines.push(format!("{}{}", "  ".repeat(depth), content));
    }
}

struct Header {
    title: String,
    inline: Option<String>,
}

fn split_sections(raw: &str, category: Category) -> Vec<Section> {
    let mut sections = vec![Section::new(None, None)];
    let mut in_final_output = false;

    for physical in raw.lines() {
        let trimmed = physical.trim();
        if is_markup_only(trimmed) {
            continue;
        }

        if !in_final_output {
            if let Some(caps) = FINAL_OUTPUT.captures(trimmed) {
                in_final_output = true;
                let mut section =
                    Section::new(Some(FINAL_OUTPUT_TITLE.to_string()), Some(FINAL_OUTPUT_KEY));
                let rest = caps["rest"].trim().trim_end_matches("**").trim();
                if !rest.is_empty() {
                    section.push_body(rest);
                }
                sections.push(section);
                continue;
            }

            if let Some(header) = detect_header(trimmed, category) {
                let mut section = Section::new(Some(header.title), None);
                if let Some(inline) = header.inline {
                    section.push_body(&inline);
                }
                sections.push(section);
                continue;
            }
        }

        if let Some(section) = sections.last_mut() {
            section.push_body(physical);
        }
    }

    sections
}

/// Blank lines and lines made only of heading or emphasis markup (`## **`,
/// `**:**`, `---`) carry nothing to keep.
fn is_markup_only(trimmed: &str) -> bool {
    trimmed
        .chars()
        .all(|c| c.is_whitespace() || matches!(c, '#' | '*' | '_' | ':' | '-'))
}

fn detect_header(trimmed: &str, category: Category) -> Option<Header> {
    find_header(trimmed, category).filter(|header| !header.title.is_empty())
}

fn find_header(trimmed: &str, category: Category) -> Option<Header> {
    if MARKDOWN_HEADING.is_match(trimmed) || NUMBERED_LABEL.is_match(trimmed) {
        return Some(Header {
            title: clean_title(trimmed),
            inline: None,
        });
    }

    if let Some(caps) = BOLD_LINE.captures(trimmed) {
        let title = caps["title"].trim();
        // A bold question is content, not a heading.
        if !title.ends_with('?') {
            return Some(Header {
                title: clean_title(title),
                inline: None,
            });
        }
    }

    label_header(trimmed, category.level_keys())
}

/// Matches lines such as `Remember:`, `Basic level`, `WHITE HAT (Facts):` or
/// `Apply: How would you ...`, whose first word is one of `labels`.
fn label_header(trimmed: &str, labels: &[&str]) -> Option<Header> {
    if labels.is_empty() {
        return None;
    }

    let unmarked = trimmed.trim_start_matches('#').replace("**", "");
    let unmarked = unmarked.trim();

    let (head, inline) = match unmarked.split_once(':') {
        Some((head, rest)) => (head.trim(), Some(rest.trim())),
        None => (unmarked, None),
    };
    let head_core = match head.find('(') {
        Some(open) if head.ends_with(')') => head[..open].trim(),
        _ => head,
    };

    let words: Vec<String> = head_core
        .split_whitespace()
        .map(|word| word.to_lowercase())
        .collect();
    if words.is_empty() || words.len() > 2 || !labels.iter().any(|label| *label == words[0]) {
        return None;
    }

    Some(Header {
        title: clean_title(head),
        inline: inline.filter(|rest| !rest.is_empty()).map(str::to_string),
    })
}

fn clean_title(raw: &str) -> String {
    let without_markup = raw.trim().trim_start_matches('#').replace("**", "");
    without_markup
        .trim()
        .trim_end_matches(':')
        .trim()
        .to_string()
}

fn strip_bullet(content: &str) -> &str {
    match BULLET.find(content) {
        Some(found) => &content[found.end()..],
        None => content,
    }
}

fn indent_width(physical: &str) -> usize {
    physical
        .chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum()
}

fn flatten(sections: Vec<Section>) -> StructuredContent {
    let mut lines = Vec::new();
    for section in sections {
        if section.lines.is_empty() {
            continue;
        }
        if let Some(title) = section.title {
            lines.push(title);
        }
        lines.extend(section.lines);
    }
    StructuredContent::Lines(lines)
}

fn bucket(sections: Vec<Section>, category: Category) -> StructuredContent {
    let mut levels: Vec<(String, Vec<String>)> = Vec::new();

    for section in sections {
        if section.lines.is_empty() {
            continue;
        }
        let key = match (section.key, section.title.as_deref()) {
            (Some(key), _) => key.to_string(),
            (None, Some(title)) => level_key(title, category.level_keys()),
            (None, None) => OVERVIEW_KEY.to_string(),
        };

        match levels.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, lines)) => lines.extend(section.lines),
            None => levels.push((key, section.lines)),
        }
    }

    StructuredContent::Levels(levels)
}

/// The level key whose word occurs earliest in `title`, or a slug of the title.
fn level_key(title: &str, keys: &[&str]) -> String {
    let lower = title.to_lowercase();
    keys.iter()
        .filter_map(|key| word_position(&lower, key).map(|position| (position, *key)))
        .min_by_key(|(position, _)| *position)
        .map(|(_, key)| key.to_string())
        .unwrap_or_else(|| slugify(title))
}

fn word_position(haystack: &str, word: &str) -> Option<usize> {
    haystack.match_indices(word).map(|(start, _)| start).find(|&start| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + word.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug = slug.trim_matches('_');
    if slug.is_empty() {
        "section".to_string()
    } else {
        slug.to_string()
    }
}
