pub mod analysis_handler;
pub mod health_handler;

pub use analysis_handler::{analyze, category_defaults, list_categories};
pub use health_handler::health_check;
