use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{AnalysisResult, Category, OutputShape};

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponseDto {
    pub request_id: String,
    pub generated_at: DateTime<Utc>,
    pub results: AnalysisResult,
}

impl AnalysisResponseDto {
    pub fn new(request_id: impl Into<String>, results: AnalysisResult) -> Self {
        Self {
            request_id: request_id.into(),
            generated_at: Utc::now(),
            results,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryInfoDto {
    pub id: Category,
    pub name: &'static str,
    pub shape: OutputShape,
    pub outline: Vec<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub levels: Vec<&'static str>,
}

impl From<Category> for CategoryInfoDto {
    fn from(category: Category) -> Self {
        CategoryInfoDto {
            id: category,
            name: category.display_name(),
            shape: category.shape(),
            outline: category.outline().to_vec(),
            levels: category.level_keys().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::StructuredContent;

    #[test]
    fn test_category_info_for_levels_category() {
        let dto: CategoryInfoDto = Category::Blooms.into();
        let json = serde_json::to_value(&dto).unwrap();

        assert_eq!(json["id"], "blooms");
        assert_eq!(json["shape"], "levels");
        assert_eq!(json["outline"][0], "Remember");
        assert_eq!(json["levels"][5], "create");
    }

    #[test]
    fn test_category_info_for_lines_category_omits_levels() {
        let json = serde_json::to_value(CategoryInfoDto::from(Category::KeyTerms)).unwrap();

        assert_eq!(json["shape"], "lines");
        assert!(json.get("levels").is_none());
    }

    #[test]
    fn test_analysis_response_serializes_results_by_category() {
        let mut results = AnalysisResult::new();
        results.insert(
            Category::Analogies,
            StructuredContent::Lines(vec!["Cells are like factories.".to_string()]),
        );

        let json = serde_json::to_value(AnalysisResponseDto::new("req-1", results)).unwrap();

        assert_eq!(json["request_id"], "req-1");
        assert!(json["generated_at"].is_string());
        assert_eq!(json["results"]["analogies"][0], "Cells are like factories.");
    }
}
