//! `concierge choose` / `concierge run`: pick (and optionally run) an assistant.

use concierge_assistants::{AssistantRegistry, AssistantSelector};
use concierge_config::AppConfig;
use concierge_core::data_source::ModelId;
use concierge_core::status::status_channel;
use concierge_providers::ChatLlm;
use tokio::task::JoinHandle;

use super::{RequestArgs, format_status};

pub async fn run(args: RequestArgs, execute: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if !config.has_api_key() {
        tracing::warn!(
            "No API key configured (set CONCIERGE_API_KEY or OPENAI_API_KEY); \
             LLM calls will likely be rejected"
        );
    }

    let registry = AssistantRegistry::from_config(&config)?;
    let mut body = args.request_body()?;
    // One model for eligibility and for the answer.
    let model = body
        .model
        .get_or_insert_with(|| config.default_model.clone())
        .clone();
    let model = ModelId::new(model);

    let router = concierge_providers::router::build_from_config(&config);
    let provider = router.default().ok_or("No default provider configured")?;

    // Status events go to stderr as they are flushed.
    let (status, mut status_rx) = status_channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = status_rx.recv().await {
            eprintln!("{}", format_status(&event));
        }
    });

    let llm = ChatLlm::from_config(provider, &config, status);
    let selector = AssistantSelector::new(&registry).with_selection_model(&config.selection.model);

    let outcome = async {
        let selection = selector.select(&llm, &model, &body, &args.sources).await?;
        let answer = if execute {
            Some(selection.assistant.handle(&llm, &body, &args.sources).await?)
        } else {
            None
        };
        Ok::<_, concierge_core::Error>((selection, answer))
    }
    .await;

    // Dropping the collaborator flushes the last status events.
    drop(llm);
    finish_printer(printer).await;

    let (selection, answer) = outcome?;

    if let Some(elapsed) = selection.llm_elapsed {
        tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "Choice call finished");
    }
    if selection.fell_back() {
        eprintln!(
            "  (model answered '{}', which is not registered)",
            selection.chosen_name
        );
    }

    match answer {
        Some(answer) => println!("{answer}"),
        None => println!("{}", selection.assistant.name),
    }

    Ok(())
}

/// Wait for the status printer; a failed printer is logged, not fatal.
async fn finish_printer(printer: JoinHandle<()>) -> bool {
    match printer.await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Status printer failed");
            false
        }
    }
}
