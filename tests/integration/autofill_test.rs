//! Auto-Fill Integration Tests
//!
//! Tests the AI interview pipeline end to end with scripted providers:
//! empty-set targeting, merge-without-overwrite, short-circuiting,
//! strict parsing, upstream error classification, and free-text mapping.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use advertis::handlers::autofill::auto_fill_interview;
use advertis::handlers::mapping::map_free_text;
use advertis::handlers::strategy::{
    create_strategy, update_interview_data, CreateStrategyRequest,
};
use advertis::handlers::Identity;
use advertis::services::llm::provider::GenerationProvider;
use advertis::services::llm::types::{GenerationError, GenerationRequest, GenerationResult};
use advertis::services::mapping::MapTextRequest;
use advertis::AppState;

// ============================================================================
// Helpers
// ============================================================================

struct ScriptedProvider {
    responses: Mutex<Vec<GenerationResult<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    fn new(responses: Vec<GenerationResult<String>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl GenerationProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }

    async fn generate(&self, request: GenerationRequest) -> GenerationResult<String> {
        self.prompts.lock().unwrap().push(request.prompt);
        self.responses.lock().unwrap().remove(0)
    }
}

fn setup(provider: Arc<ScriptedProvider>) -> (AppState, Identity, String) {
    let state = AppState::in_memory(provider).unwrap();
    let identity = Identity::resolve(&state.roles, "user-1", "freelance");
    let sid = create_strategy(
        &state,
        &identity,
        CreateStrategyRequest {
            brand_name: "Maison Verte".into(),
            sector: Some("home goods".into()),
            node_type: None,
            parent_id: None,
        },
    )
    .data
    .unwrap()
    .id;
    (state, identity, sid)
}

fn data(pairs: &[(&str, &str)]) -> std::collections::BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// ============================================================================
// Merge semantics
// ============================================================================

#[tokio::test]
async fn test_fill_targets_only_the_empty_set() {
    let provider = ScriptedProvider::new(vec![Ok(
        r#"{"A1": "model tries to overwrite", "A2": "time-starved owners", "D1": ""}"#.into(),
    )]);
    let (state, identity, sid) = setup(provider.clone());

    update_interview_data(&state, &identity, &sid, data(&[("A1", "typed by hand")]));

    let resp = auto_fill_interview(&state, &identity, &sid).await;
    let result = resp.data.unwrap();

    // User input survives; blank generated value rejected
    assert_eq!(result.filled_data.get("A1"), Some("typed by hand"));
    assert_eq!(result.filled_data.get("A2"), Some("time-starved owners"));
    assert_eq!(result.filled_data.get("D1"), None);
    assert_eq!(result.auto_filled_ids, vec!["A2"]);
    assert_eq!(result.total_filled, 2);

    // The prompt carried the filled value as context, not as a target
    let prompt = provider.last_prompt();
    assert!(prompt.contains("typed by hand"));
    assert!(prompt.contains("- A2: Customer pain"));
    assert!(!prompt.contains("- A1: Ideal customer"));
}

#[tokio::test]
async fn test_fully_filled_interview_short_circuits() {
    let provider = ScriptedProvider::new(vec![]);
    let (state, identity, sid) = setup(provider.clone());

    let all: Vec<(String, String)> = state
        .schema
        .variable_ids()
        .into_iter()
        .map(|id| (id.to_string(), "value".to_string()))
        .collect();
    let all_ref: Vec<(&str, &str)> = all.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    update_interview_data(&state, &identity, &sid, data(&all_ref));

    let resp = auto_fill_interview(&state, &identity, &sid).await;
    let result = resp.data.unwrap();
    assert!(result.auto_filled_ids.is_empty());
    assert_eq!(result.total_filled, result.total_variables);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_repeated_fill_converges() {
    let provider = ScriptedProvider::new(vec![
        Ok(r#"{"A1": "first pass"}"#.into()),
        Ok(r#"{"A1": "second pass tries again", "A2": "new answer"}"#.into()),
    ]);
    let (state, identity, sid) = setup(provider);

    auto_fill_interview(&state, &identity, &sid).await;
    let resp = auto_fill_interview(&state, &identity, &sid).await;
    let result = resp.data.unwrap();

    // First pass result is now user-visible data and stays put
    assert_eq!(result.filled_data.get("A1"), Some("first pass"));
    assert_eq!(result.auto_filled_ids, vec!["A2"]);
}

// ============================================================================
// Failure classification
// ============================================================================

#[tokio::test]
async fn test_prose_response_fails_and_persists_nothing() {
    let provider =
        ScriptedProvider::new(vec![Ok("I would suggest focusing on authenticity.".into())]);
    let (state, identity, sid) = setup(provider);

    let resp = auto_fill_interview(&state, &identity, &sid).await;
    let err = resp.error.unwrap();
    assert_eq!(err.status, 500);
    assert_eq!(err.retryable, None);

    let strategy = state.strategies.get(&sid).unwrap().unwrap();
    assert!(strategy.interview_data.is_empty());
}

#[tokio::test]
async fn test_fenced_response_is_accepted() {
    let provider = ScriptedProvider::new(vec![Ok(
        "Here you go:\n```json\n{\"V1\": \"warm and direct\"}\n```".into(),
    )]);
    let (state, identity, sid) = setup(provider);

    let resp = auto_fill_interview(&state, &identity, &sid).await;
    assert_eq!(resp.data.unwrap().auto_filled_ids, vec!["V1"]);
}

#[tokio::test]
async fn test_overloaded_upstream_is_retryable_503() {
    let provider = ScriptedProvider::new(vec![Err(GenerationError::Overloaded {
        message: "Overloaded".into(),
    })]);
    let (state, identity, sid) = setup(provider);

    let err = auto_fill_interview(&state, &identity, &sid).await.error.unwrap();
    assert_eq!(err.status, 503);
    assert_eq!(err.retryable, Some(true));
}

#[tokio::test]
async fn test_auth_failure_is_fatal_500() {
    let provider = ScriptedProvider::new(vec![Err(GenerationError::AuthenticationFailed {
        message: "invalid key".into(),
    })]);
    let (state, identity, sid) = setup(provider);

    let err = auto_fill_interview(&state, &identity, &sid).await.error.unwrap();
    assert_eq!(err.status, 500);
    assert_eq!(err.retryable, None);
}

// ============================================================================
// Free-text mapping
// ============================================================================

#[tokio::test]
async fn test_mapping_previews_without_persisting() {
    let provider = ScriptedProvider::new(vec![Ok(
        r#"{"A1": "eco-conscious households", "V1": "calm, editorial"}"#.into(),
    )]);
    let (state, identity, sid) = setup(provider.clone());

    let request = MapTextRequest {
        text: "sustainable home goods brand story ".repeat(20),
        brand_name: Some("Maison Verte".into()),
        sector: Some("home goods".into()),
    };
    let resp = map_free_text(&state, &identity, request).await;
    let preview = resp.data.unwrap();

    assert_eq!(preview.mapped_variables.len(), 2);
    assert_eq!(preview.unmapped_variables.len(), state.schema.len() - 2);
    assert!((preview.confidence - 0.2).abs() < 1e-9);

    // The optional hints were carried into the extraction prompt
    let prompt = provider.last_prompt();
    assert!(prompt.contains("Brand: Maison Verte"));
    assert!(prompt.contains("Sector: home goods"));

    // Preview only: strategy data untouched until the caller applies it
    let strategy = state.strategies.get(&sid).unwrap().unwrap();
    assert!(strategy.interview_data.is_empty());
}

#[tokio::test]
async fn test_mapping_rejects_thin_text_before_the_model() {
    let provider = ScriptedProvider::new(vec![]);
    let (state, identity, _) = setup(provider.clone());

    let resp = map_free_text(&state, &identity, MapTextRequest::new("we sell candles")).await;
    assert_eq!(resp.error.unwrap().status, 400);
    assert_eq!(provider.call_count(), 0);
}
