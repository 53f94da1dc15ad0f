//! End-to-end tests for assistant selection.
//!
//! These drive the whole pipeline: a scripted provider behind the real
//! `ChatLlm`, the selector, status delivery and the chosen assistant's handler.

use std::sync::{Arc, Mutex};

use concierge_assistants::{
    Assistant, AssistantRegistry, AssistantSelector, CustomAssistant, choose_assistant_for_request,
};
use concierge_core::data_source::{DataSource, ModelId};
use concierge_core::error::{Error, ProviderError};
use concierge_core::message::{Message, RequestBody};
use concierge_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use concierge_core::status::{StatusEvent, status_channel};
use concierge_providers::ChatLlm;
use tokio::sync::mpsc::UnboundedReceiver;

// ── Mock Provider ────────────────────────────────────────────────────────

/// A mock provider that returns scripted replies in sequence.
struct ScriptedProvider {
    replies: Vec<Result<String, ProviderError>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    fn new(replies: Vec<Result<String, ProviderError>>) -> Arc<Self> {
        Arc::new(Self {
            replies,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn text(replies: &[&str]) -> Arc<Self> {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn request(&self, index: usize) -> ProviderRequest {
        self.requests.lock().unwrap()[index].clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let index = requests.len();
        requests.push(request);
        let reply = self.replies.get(index).unwrap_or_else(|| {
            panic!(
                "ScriptedProvider exhausted: call #{index}, have {}",
                self.replies.len()
            )
        });
        reply.clone().map(|text| ProviderResponse {
            message: Message::assistant(text),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model: "mock".into(),
        })
    }
}

fn llm_with(provider: Arc<ScriptedProvider>) -> (ChatLlm, UnboundedReceiver<StatusEvent>) {
    let (status, rx) = status_channel();
    (ChatLlm::new(provider, "gpt-4o-mini", status), rx)
}

fn drain(rx: &mut UnboundedReceiver<StatusEvent>) -> Vec<StatusEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn model() -> ModelId {
    ModelId::new("gpt-4o-mini")
}

// ── E2E: Selection ───────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_csv_request_is_routed_by_the_model() {
    let provider = ScriptedProvider::text(&["csv"]);
    let (llm, mut rx) = llm_with(provider.clone());
    let body = RequestBody::from_user("What is the sum of column B?");
    let sources = vec![DataSource::new("sales", "csv")];

    let chosen = choose_assistant_for_request(&llm, &model(), &body, &sources, None)
        .await
        .unwrap();

    assert_eq!(chosen.name, "csv");
    assert_eq!(provider.calls(), 1);

    // The choice call goes to the selection model and carries the question.
    let request = provider.request(0);
    assert_eq!(request.model, "gpt-4o");
    let prompt: String = request.messages.iter().map(|m| m.content.as_str()).collect();
    assert!(prompt.contains("sales: (csv)"));
    assert!(prompt.contains("What is the sum of column B?"));
    assert!(prompt.contains("default, csv"));

    // The progress indicator was flushed before the choice call; the rest
    // is delivered when the collaborator goes away.
    let early = drain(&mut rx);
    assert_eq!(early, vec![StatusEvent::progress("Choosing an assistant to help")]);

    drop(llm);
    let late = drain(&mut rx);
    assert_eq!(late.len(), 2);
    assert_eq!(late[0], StatusEvent::done());
    assert_eq!(late[1].message.as_deref(), Some("The \"CSV Assistant\" is responding."));
    assert_eq!(late[1].icon.as_deref(), Some("assistant"));
    assert_eq!(late[1].sticky, Some(true));
}

#[tokio::test]
async fn e2e_no_data_sources_skips_the_model() {
    let provider = ScriptedProvider::text(&[]);
    let (llm, mut rx) = llm_with(provider.clone());
    let body = RequestBody::from_user("Hello there");

    let chosen = choose_assistant_for_request(&llm, &model(), &body, &[], None)
        .await
        .unwrap();

    assert_eq!(chosen.name, "default");
    assert_eq!(provider.calls(), 0);

    drop(llm);
    let events = drain(&mut rx);
    assert_eq!(events.len(), 3);
    assert!(events[0].in_progress);
    assert_eq!(events[1], StatusEvent::done());
    assert_eq!(
        events[2].message.as_deref(),
        Some("The \"Default Assistant\" is responding.")
    );
}

#[tokio::test]
async fn e2e_unknown_choice_falls_back_to_default() {
    let provider = ScriptedProvider::text(&["I would pick the spreadsheet wizard"]);
    let (llm, _rx) = llm_with(provider.clone());
    let body = RequestBody::from_user("Average of column C?");
    let sources = vec![DataSource::new("report", "csv")];
    let registry = AssistantRegistry::builtin();

    let selection = AssistantSelector::new(&registry)
        .select(&llm, &model(), &body, &sources)
        .await
        .unwrap();

    assert_eq!(selection.assistant.name, "default");
    assert!(selection.fell_back());
    assert_eq!(selection.candidates, 2);
    assert!(selection.llm_elapsed.is_some());
}

#[tokio::test]
async fn e2e_choice_failure_propagates() {
    let provider = ScriptedProvider::new(vec![Err(ProviderError::RateLimited {
        retry_after_secs: 5,
    })]);
    let (llm, mut rx) = llm_with(provider.clone());
    let body = RequestBody::from_user("Sum column B");
    let sources = vec![DataSource::new("sales", "csv")];

    let err = choose_assistant_for_request(&llm, &model(), &body, &sources, None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Provider(ProviderError::RateLimited { .. })));

    // Only the progress indicator made it out.
    drop(llm);
    let events = drain(&mut rx);
    assert_eq!(events.len(), 1);
    assert!(events[0].in_progress);
}

#[tokio::test]
async fn e2e_custom_registry_with_model_restriction() {
    let registry = AssistantRegistry::builtin()
        .with(Assistant::custom(
            "ledger",
            "Ledger Assistant",
            "Reconciles accounting ledgers",
            CustomAssistant {
                data_source_types: vec!["ledger".into()],
                models: vec!["gpt-4o".into()],
                instructions: None,
            },
        ))
        .unwrap();
    let body = RequestBody::from_user("Reconcile March");
    let sources = vec![DataSource::new("books", "ledger")];

    // The ledger assistant doesn't support this model, so only the default is left.
    let provider = ScriptedProvider::text(&[]);
    let (llm, _rx) = llm_with(provider.clone());
    let chosen = choose_assistant_for_request(&llm, &model(), &body, &sources, Some(&registry))
        .await
        .unwrap();
    assert_eq!(chosen.name, "default");
    assert_eq!(provider.calls(), 0);

    // With a supported model both compete and the model decides.
    let provider = ScriptedProvider::text(&["ledger"]);
    let (llm, _rx) = llm_with(provider.clone());
    let chosen = choose_assistant_for_request(
        &llm,
        &ModelId::new("gpt-4o"),
        &body,
        &sources,
        Some(&registry),
    )
    .await
    .unwrap();
    assert_eq!(chosen.name, "ledger");
    assert_eq!(provider.calls(), 1);
}

// ── E2E: Select then Handle ──────────────────────────────────────────────

#[tokio::test]
async fn e2e_sql_request_selects_and_generates_query() {
    let provider = ScriptedProvider::text(&[
        "sql",
        "Here you go:\n```sql\nSELECT SUM(total) FROM orders;\n```",
    ]);
    let (llm, _rx) = llm_with(provider.clone());
    let body = RequestBody::from_user("Total of all orders?");
    let sources = vec![DataSource::new("shop", "postgres")];

    let chosen = choose_assistant_for_request(&llm, &model(), &body, &sources, None)
        .await
        .unwrap();
    assert_eq!(chosen.name, "sql");

    let answer = chosen.handle(&llm, &body, &sources).await.unwrap();
    assert_eq!(answer, "SELECT SUM(total) FROM orders;");
    assert_eq!(provider.calls(), 2);

    // The generation request names the schema and the question.
    let request = provider.request(1);
    let prompt: String = request.messages.iter().map(|m| m.content.as_str()).collect();
    assert!(prompt.contains("shop: (postgres)"));
    assert!(prompt.contains("Total of all orders?"));
}

#[tokio::test]
async fn e2e_default_assistant_answers_directly() {
    let provider = ScriptedProvider::text(&["Hi! How can I help?"]);
    let (llm, mut rx) = llm_with(provider.clone());
    let body = RequestBody::from_user("Hello");

    let chosen = choose_assistant_for_request(&llm, &model(), &body, &[], None)
        .await
        .unwrap();
    let answer = chosen.handle(&llm, &body, &[]).await.unwrap();

    assert_eq!(answer, "Hi! How can I help?");
    assert_eq!(provider.calls(), 1);
    assert_eq!(provider.request(0).model, "gpt-4o-mini");

    // The answer's response boundary delivered the queued announcement.
    let events = drain(&mut rx);
    assert_eq!(events.len(), 3);
    assert_eq!(events[2].sticky, Some(true));
}
