use serde::Deserialize;
use validator::Validate;

use crate::errors::{AppError, AppResult};
use crate::models::domain::{AnalysisRequest, Category};

/// Method name selecting every category.
pub const ALL_METHODS: &str = "all";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnalyzeRequestDto {
    #[validate(length(min = 1, max = 1_000_000, message = "Text must be 1 to 1000000 bytes"))]
    pub text: String,

    #[serde(default)]
    pub methods: Vec<String>,
}

impl AnalyzeRequestDto {
    /// Resolves method names to categories. Absent, empty or `"all"` selects
    /// every category; an unknown name is rejected.
    pub fn categories(&self) -> AppResult<Vec<Category>> {
        if self
            .methods
            .iter()
            .any(|method| method.trim().eq_ignore_ascii_case(ALL_METHODS))
        {
            return Ok(Category::ALL.to_vec());
        }

        self.methods.iter().map(|method| method.parse::<Category>()).collect()
    }
}

impl TryFrom<AnalyzeRequestDto> for AnalysisRequest {
    type Error = AppError;

    fn try_from(dto: AnalyzeRequestDto) -> Result<Self, Self::Error> {
        dto.validate()?;
        let categories = dto.categories()?;
        AnalysisRequest::new(dto.text, categories)
    }
}
