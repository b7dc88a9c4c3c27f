use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::sync::RwLock;

use scholia_server::{
    config::GenerationSettings,
    errors::AppError,
    models::domain::{AnalysisRequest, Category, StructuredContent},
    services::{
        completion_client::{CompletionClient, RetryPolicy, SharedClientProvider},
        default_results::default_for,
        prompt_builder::{build_prompt, outline_labels},
        ContentGenerator,
    },
};

/// Replays a per-category script of responses; `None` entries fail the call.
/// Once a script runs out, further calls fail.
struct ScriptedClient {
    scripts: RwLock<HashMap<Category, Vec<Option<String>>>>,
    calls: RwLock<HashMap<Category, usize>>,
}

impl ScriptedClient {
    fn new() -> Self {
        Self {
            scripts: RwLock::new(HashMap::new()),
            calls: RwLock::new(HashMap::new()),
        }
    }

    async fn script(&self, category: Category, responses: &[Option<&str>]) {
        let responses = responses
            .iter()
            .map(|response| response.map(str::to_string))
            .collect();
        self.scripts.write().await.insert(category, responses);
    }

    async fn calls(&self, category: Category) -> usize {
        self.calls.read().await.get(&category).copied().unwrap_or(0)
    }

    fn category_of(prompt: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|&category| {
            let instruction = build_prompt(category, "").instruction;
            let task = instruction.lines().next().unwrap_or_default();
            prompt.starts_with(task)
        })
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, prompt: &str) -> Option<String> {
        let category = Self::category_of(prompt)?;
        *self.calls.write().await.entry(category).or_insert(0) += 1;

        let mut scripts = self.scripts.write().await;
        let script = scripts.get_mut(&category)?;
        if script.is_empty() {
            return None;
        }
        script.remove(0)
    }
}

fn generator(client: Arc<ScriptedClient>, max_attempts: u32) -> ContentGenerator {
    ContentGenerator::new(
        Arc::new(SharedClientProvider::new(client)),
        RetryPolicy {
            max_attempts,
            backoff: Duration::ZERO,
        },
        GenerationSettings::default(),
    )
}

const TEXT: &str = "Artificial intelligence is changing how students learn. \
    Adaptive tutors adjust the pace of instruction, and feedback arrives within seconds.";

#[tokio::test]
async fn mixed_outcomes_are_isolated_per_category() {
    let client = Arc::new(ScriptedClient::new());
    client
        .script(
            Category::Summary,
            &[
                None,
                Some("STEP 1: Main Points\n- AI improves learning\nSTEP 2: Synthesis\n- Connects to outcomes"),
            ],
        )
        .await;
    client
        .script(Category::Blooms, &[Some("Just some prose about adaptive tutors.")])
        .await;

    let request = AnalysisRequest::new(
        TEXT,
        vec![Category::Summary, Category::Blooms, Category::KeyTerms],
    )
    .unwrap();
    let result = generator(client.clone(), 3).analyze(&request).await.unwrap();

    assert_eq!(result.len(), 3);
    assert_eq!(
        result.get(Category::Summary),
        Some(&StructuredContent::Lines(vec![
            "STEP 1: Main Points".to_string(),
            "AI improves learning".to_string(),
            "STEP 2: Synthesis".to_string(),
            "Connects to outcomes".to_string(),
        ]))
    );
    assert_eq!(
        result.get(Category::Blooms),
        Some(&StructuredContent::Levels(vec![(
            "overview".to_string(),
            vec!["Just some prose about adaptive tutors.".to_string()],
        )]))
    );
    assert_eq!(result.get(Category::KeyTerms), Some(&default_for(Category::KeyTerms)));

    assert_eq!(client.calls(Category::Summary).await, 2);
    assert_eq!(client.calls(Category::Blooms).await, 1);
    assert_eq!(client.calls(Category::KeyTerms).await, 3);
}

#[tokio::test]
async fn explanation_levels_are_keyed_by_level_name() {
    let client = Arc::new(ScriptedClient::new());
    client
        .script(
            Category::Explanations,
            &[Some(
                "LEVEL 1: Basic\n- Computers help students.\n\
                 LEVEL 2: Intermediate\n- Adaptive systems track progress.\n\
                 LEVEL 3: Advanced\n- Models estimate mastery.\n\
                 LEVEL 4: Expert\n- Open questions remain about bias.",
            )],
        )
        .await;

    let result = generator(client, 1)
        .analyze_text(TEXT, &[Category::Explanations])
        .await
        .unwrap();
    let content = result.get(Category::Explanations).unwrap();

    assert_eq!(
        content.level_keys(),
        vec!["basic", "intermediate", "advanced", "expert"]
    );
    assert_eq!(
        content.level("advanced"),
        Some(&["Models estimate mastery.".to_string()][..])
    );
}

#[tokio::test]
async fn seven_hats_prompt_labels_round_trip_to_hat_keys() {
    let response = outline_labels(Category::SevenHats)
        .iter()
        .map(|label| format!("{}\n- Point under {}", label, label))
        .collect::<Vec<_>>()
        .join("\n");
    assert!(response.starts_with("LEVEL 1: White Hat"));

    let client = Arc::new(ScriptedClient::new());
    client.script(Category::SevenHats, &[Some(response.as_str())]).await;

    let result = generator(client, 1)
        .analyze_text(TEXT, &[Category::SevenHats])
        .await
        .unwrap();
    let content = result.get(Category::SevenHats).unwrap();

    assert_eq!(
        content.level_keys(),
        vec!["white", "red", "black", "yellow", "green", "blue"]
    );
    assert_eq!(
        content.level("green"),
        Some(&["Point under LEVEL 5: Green Hat".to_string()][..])
    );
}

#[tokio::test]
async fn every_category_is_present_when_nothing_answers() {
    let client = Arc::new(ScriptedClient::new());

    let result = generator(client.clone(), 2).analyze_text(TEXT, &[]).await.unwrap();

    assert_eq!(result.len(), Category::ALL.len());
    for category in Category::ALL {
        let content = result.get(category).unwrap();
        assert!(!content.is_empty());
        assert_eq!(content.shape(), category.shape());
        assert_eq!(client.calls(category).await, 2);
    }
}

#[tokio::test]
async fn empty_text_makes_no_calls() {
    let client = Arc::new(ScriptedClient::new());

    let err = generator(client.clone(), 3)
        .analyze_text("\n\t ", &[Category::Summary])
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidInput(_)));
    for category in Category::ALL {
        assert_eq!(client.calls(category).await, 0);
    }
}

#[test]
fn scripted_client_recognizes_each_category_prompt() {
    for category in Category::ALL {
        let prompt = build_prompt(category, TEXT).instruction;
        assert_eq!(ScriptedClient::category_of(&prompt), Some(category));
    }
}
