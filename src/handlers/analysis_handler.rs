use std::sync::Arc;

use actix_web::{get, post, web, HttpRequest, HttpResponse};
use uuid::Uuid;

use crate::{
    app_state::AppState,
    errors::AppError,
    middleware::get_request_id,
    services::default_results::default_for_name,
    models::{
        domain::{AnalysisRequest, Category},
        dto::{
            request::AnalyzeRequestDto,
            response::{AnalysisResponseDto, CategoryInfoDto},
        },
    },
};

#[post("/api/analyze")]
pub async fn analyze(
    state: web::Data<Arc<AppState>>,
    req: HttpRequest,
    request: web::Json<AnalyzeRequestDto>,
) -> Result<HttpResponse, AppError> {
    let request_id = get_request_id(&req).unwrap_or_else(|| Uuid::new_v4().to_string());
    let request: AnalysisRequest = request.into_inner().try_into()?;
    log::info!(
        "[{}] Analyzing {} characters for {:?}",
        request_id,
        request.text().chars().count(),
        request.categories()
    );

    let results = state.generator.analyze(&request).await?;
    Ok(HttpResponse::Ok().json(AnalysisResponseDto::new(request_id, results)))
}

#[get("/api/categories")]
pub async fn list_categories() -> HttpResponse {
    let categories: Vec<CategoryInfoDto> = Category::ALL.into_iter().map(Into::into).collect();
    HttpResponse::Ok().json(categories)
}

/// Content served for `method` when generation fails. Unknown names get the
/// generic fallback line.
#[get("/api/categories/{method}/defaults")]
pub async fn category_defaults(method: web::Path<String>) -> HttpResponse {
    HttpResponse::Ok().json(default_for_name(&method))
}
