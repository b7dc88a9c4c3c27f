use std::sync::Arc;

use crate::{
    config::Config,
    errors::AppResult,
    services::{ChatCompletionProvider, ContentGenerator, RetryPolicy, SessionProvider},
};

#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<ContentGenerator>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        config.validate()?;

        let sessions = Arc::new(ChatCompletionProvider::new(config.llm.clone()));
        Ok(Self::with_sessions(config, sessions))
    }

    /// Builds the state around a caller-chosen session provider.
    pub fn with_sessions(config: Config, sessions: Arc<dyn SessionProvider>) -> Self {
        let generator = Arc::new(ContentGenerator::new(
            sessions,
            RetryPolicy::from_settings(&config.llm),
            config.generation.clone(),
        ));

        Self {
            generator,
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_app_state_rejects_invalid_config() {
        let mut config = Config::test_config();
        config.generation.max_concurrency = 0;

        assert!(matches!(AppState::new(config), Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_app_state_builds_from_test_config() {
        let state = AppState::new(Config::test_config()).unwrap();
        assert_eq!(state.config.generation.max_concurrency, 4);
    }
}
