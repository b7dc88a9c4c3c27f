pub mod category;
pub mod content;
pub use category::{Category, OutputShape};
pub use content::{AnalysisRequest, AnalysisResult, PromptSpec, StructuredContent};
