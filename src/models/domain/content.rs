use std::collections::BTreeMap;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::errors::{AppError, AppResult};
use crate::models::domain::category::{Category, OutputShape};

/// Normalized output of one category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StructuredContent {
    Lines(Vec<String>),
    /// Ordered `(level key, lines)` pairs; serialized as a JSON object.
    Levels(Vec<(String, Vec<String>)>),
}

impl StructuredContent {
    pub fn shape(&self) -> OutputShape {
        match self {
            StructuredContent::Lines(_) => OutputShape::Lines,
            StructuredContent::Levels(_) => OutputShape::Levels,
        }
    }

    pub fn line_count(&self) -> usize {
        match self {
            StructuredContent::Lines(lines) => lines.len(),
            StructuredContent::Levels(levels) => levels.iter().map(|(_, lines)| lines.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.line_count() == 0
    }

    pub fn as_lines(&self) -> Option<&[String]> {
        match self {
            StructuredContent::Lines(lines) => Some(lines),
            StructuredContent::Levels(_) => None,
        }
    }

    pub fn level(&self, key: &str) -> Option<&[String]> {
        match self {
            StructuredContent::Lines(_) => None,
            StructuredContent::Levels(levels) => levels
                .iter()
                .find(|(level, _)| level == key)
                .map(|(_, lines)| lines.as_slice()),
        }
    }

    pub fn level_keys(&self) -> Vec<&str> {
        match self {
            StructuredContent::Lines(_) => Vec::new(),
            StructuredContent::Levels(levels) => levels.iter().map(|(key, _)| key.as_str()).collect(),
        }
    }
}

impl Serialize for StructuredContent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StructuredContent::Lines(lines) => {
                let mut seq = serializer.serialize_seq(Some(lines.len()))?;
                for line in lines {
                    seq.serialize_element(line)?;
                }
                seq.end()
            }
            StructuredContent::Levels(levels) => {
                let mut map = serializer.serialize_map(Some(levels.len()))?;
                for (key, lines) in levels {
                    map.serialize_entry(key, lines)?;
                }
                map.end()
            }
        }
    }
}

/// Validated input for one analysis run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisRequest {
    text: String,
    categories: Vec<Category>,
}

impl AnalysisRequest {
    /// Fails with `InvalidInput` on blank text. An empty category list means all.
    pub fn new(text: impl Into<String>, categories: Vec<Category>) -> AppResult<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(AppError::InvalidInput("Text content is required".to_string()));
        }

        let mut unique = Vec::with_capacity(categories.len());
        for category in categories {
            if !unique.contains(&category) {
                unique.push(category);
            }
        }
        if unique.is_empty() {
            unique = Category::ALL.to_vec();
        }

        Ok(Self {
            text,
            categories: unique,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }
}

/// Instruction sent to the model for one category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptSpec {
    pub category: Category,
    pub instruction: String,
    pub outline: Option<Vec<String>>,
}

/// One entry per requested category. Key order carries no meaning.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnalysisResult {
    entries: BTreeMap<Category, StructuredContent>,
}

impl AnalysisResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: Category, content: StructuredContent) {
        self.entries.insert(category, content);
    }

    pub fn get(&self, category: Category) -> Option<&StructuredContent> {
        self.entries.get(&category)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Category, &StructuredContent)> {
        self.entries.iter()
    }
}
