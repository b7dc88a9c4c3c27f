use std::sync::Arc;

use tokio::{sync::Semaphore, task::JoinSet};

use crate::{
    config::GenerationSettings,
    errors::{AppError, AppResult},
    models::domain::{AnalysisRequest, AnalysisResult, Category, StructuredContent},
    services::{
        completion_client::{complete_with_retry, CompletionClient, RetryPolicy, SessionProvider},
        default_results::default_for,
        normalizer::normalize,
        prompt_builder::{build_prompt, preprocess_text},
    },
};

/// Runs every requested category against one completion session.
///
/// A category that fails for any reason, including a panic in its task,
/// resolves to its default content; the other categories are unaffected.
/// Dropping the returned future aborts every category task still running,
/// which also releases the session.
pub struct ContentGenerator {
    sessions: Arc<dyn SessionProvider>,
    retry: RetryPolicy,
    settings: GenerationSettings,
}

impl ContentGenerator {
    pub fn new(
        sessions: Arc<dyn SessionProvider>,
        retry: RetryPolicy,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            sessions,
            retry,
            settings,
        }
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> AppResult<AnalysisResult> {
        self.analyze_text(request.text(), request.categories()).await
    }

    /// Fails only on blank `text`. An empty `categories` slice means all.
    pub async fn analyze_text(
        &self,
        text: &str,
        categories: &[Category],
    ) -> AppResult<AnalysisResult> {
        if text.trim().is_empty() {
            return Err(AppError::InvalidInput("Text content is required".to_string()));
        }

        let categories = requested(categories);
        let processed = Arc::new(preprocess_text(text, self.settings.max_text_chars));
        log::info!(
            "Generating {} categories for {} characters of text",
            categories.len(),
            processed.chars().count()
        );

        let client = match self.sessions.open_session() {
            Ok(client) => client,
            Err(err) => {
                log::error!("Failed to open completion session: {}", err);
                return Ok(defaults_for(&categories));
            }
        };

        let semaphore = Arc::new(Semaphore::new(self.settings.max_concurrency.max(1)));
        let mut tasks = JoinSet::new();
        for &category in &categories {
            let client = Arc::clone(&client);
            let text = Arc::clone(&processed);
            let semaphore = Arc::clone(&semaphore);
            let retry = self.retry;

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let content = generate_category(client.as_ref(), category, &text, retry).await;
                (category, content)
            });
        }
        drop(client);

        let mut result = AnalysisResult::new();
        while let Some(outcome) = tasks.join_next().await {
            match outcome {
                Ok((category, content)) => result.insert(category, content),
                Err(err) => log::error!("Generation task failed: {}", err),
            }
        }

        for &category in &categories {
            if result.get(category).is_none() {
                log::warn!("No content for {}, using default content", category);
                result.insert(category, default_for(category));
            }
        }

        log::info!("Generated content for {} categories", result.len());
        Ok(result)
    }
}

async fn generate_category(
    client: &dyn CompletionClient,
    category: Category,
    text: &str,
    retry: RetryPolicy,
) -> StructuredContent {
    let prompt = build_prompt(category, text);
    log::debug!("Generating {}", category.display_name());

    let raw = complete_with_retry(client, &prompt.instruction, retry).await;
    if raw.is_none() {
        log::warn!("No response for {}, using default content", category);
    }

    normalize(raw.as_deref(), category)
}

fn requested(categories: &[Category]) -> Vec<Category> {
    if categories.is_empty() {
        return Category::ALL.to_vec();
    }

    let mut unique = Vec::with_capacity(categories.len());
    for &category in categories {
        if !unique.contains(&category) {
            unique.push(category);
        }
    }
    unique
}

fn defaults_for(categories: &[Category]) -> AnalysisResult {
    let mut result = AnalysisResult::new();
    for &category in categories {
        result.insert(category, default_for(category));
    }
    result
}
