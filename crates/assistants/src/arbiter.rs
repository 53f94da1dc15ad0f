//! The decision call: ask the LLM which eligible assistant should answer.

use concierge_core::data_source::DataSource;
use concierge_core::error::Result;
use concierge_core::llm::{ChoiceRequest, Llm};
use concierge_core::message::{Message, RequestBody};
use tracing::debug;

use crate::assistant::Assistant;
use crate::prompt::{build_assistant_description_messages, build_data_source_description_messages};
use crate::registry::builtin_registry;

/// Model that makes the choice unless configured otherwise. It is picked
/// for accuracy and is independent of the model that answers the request.
pub const SELECTION_MODEL: &str = "gpt-4o";

const SYSTEM_DIRECTIVE: &str = "You are a dispatcher. Your job is to pick the assistant that is \
best suited to handle the user's task, given the data sources attached to the request and what \
each assistant can do. Answer with the assistant's name only.";

/// Build the two-message instruction for the choice call.
pub fn build_choice_request(
    model: &str,
    body: &RequestBody,
    data_sources: &[DataSource],
    assistants: &[&Assistant],
) -> ChoiceRequest {
    let assistant_text = build_assistant_description_messages(assistants);
    let data_source_text = build_data_source_description_messages(data_sources);

    let mut directive = String::new();
    if !data_source_text.is_empty() {
        directive.push_str("The user has attached these data sources:\n");
        directive.push_str(&data_source_text);
        directive.push_str("\n\n");
    }
    directive.push_str("These assistants are available:\n");
    directive.push_str(&assistant_text);
    directive.push_str("\n\nWhich assistant should handle this task?\n\n");
    directive.push_str(body.last_message_content());

    ChoiceRequest {
        model: model.to_string(),
        messages: vec![Message::system(SYSTEM_DIRECTIVE), Message::user(directive)],
    }
}

/// Ask `llm` to choose among `assistants` using `model`.
///
/// The answer is returned as-is; it is not checked against the options.
pub async fn choose_with_model(
    llm: &dyn Llm,
    model: &str,
    body: &RequestBody,
    data_sources: &[DataSource],
    assistants: &[&Assistant],
) -> Result<String> {
    let request = build_choice_request(model, body, data_sources, assistants);
    let options: Vec<String> = assistants.iter().map(|a| a.name.clone()).collect();

    debug!(model, options = ?options, "Requesting assistant choice");
    let name = llm.prompt_for_choice(request, &options, &[]).await?;
    Ok(name)
}

/// Ask `llm` to choose among `assistants`, or among the built-in
/// assistants when none are given, using [`SELECTION_MODEL`].
pub async fn choose_assistant_for_request_with_llm(
    llm: &dyn Llm,
    body: &RequestBody,
    data_sources: &[DataSource],
    assistants: Option<&[&Assistant]>,
) -> Result<String> {
    match assistants {
        Some(assistants) => {
            choose_with_model(llm, SELECTION_MODEL, body, data_sources, assistants).await
        }
        None => {
            let builtin: Vec<&Assistant> = builtin_registry().iter().collect();
            choose_with_model(llm, SELECTION_MODEL, body, data_sources, &builtin).await
        }
    }
}
