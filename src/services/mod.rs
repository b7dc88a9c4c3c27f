pub mod completion_client;
pub mod content_generator;
pub mod default_results;
pub mod normalizer;
pub mod prompt_builder;

pub use completion_client::{
    ChatCompletionProvider, CompletionClient, RetryPolicy, SessionProvider, SharedClientProvider,
};
pub use content_generator::ContentGenerator;
