//! `ChatLlm`: the production [`Llm`] collaborator.
//!
//! Wraps a [`Provider`] for prompting and constrained choices, and a
//! [`StatusChannel`] for status output.

use std::sync::Arc;

use async_trait::async_trait;
use concierge_core::data_source::DataSource;
use concierge_core::error::ProviderError;
use concierge_core::llm::{ChoiceRequest, Llm};
use concierge_core::message::{Message, RequestBody};
use concierge_core::provider::{Provider, ProviderRequest};
use concierge_core::status::{StatusChannel, StatusEvent};
use tracing::{debug, warn};

/// LLM collaborator backed by a chat-completions provider.
pub struct ChatLlm {
    provider: Arc<dyn Provider>,
    /// Model used when the request body doesn't name one.
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    choice_temperature: f32,
    choice_max_tokens: Option<u32>,
    status: StatusChannel,
}

impl ChatLlm {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>, status: StatusChannel) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
            choice_temperature: 0.0,
            choice_max_tokens: Some(64),
            status,
        }
    }

    /// Build from the application config's defaults.
    pub fn from_config(
        provider: Arc<dyn Provider>,
        config: &concierge_config::AppConfig,
        status: StatusChannel,
    ) -> Self {
        Self::new(provider, &config.default_model, status)
            .with_temperature(config.default_temperature)
            .with_max_tokens(config.default_max_tokens)
            .with_choice_settings(config.selection.temperature, config.selection.max_tokens)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_choice_settings(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.choice_temperature = temperature;
        self.choice_max_tokens = Some(max_tokens);
        self
    }
}

#[async_trait]
impl Llm for ChatLlm {
    async fn prompt(
        &self,
        body: &RequestBody,
        data_sources: &[DataSource],
    ) -> Result<String, ProviderError> {
        let model = body.model.clone().unwrap_or_else(|| self.model.clone());

        let mut messages = Vec::with_capacity(body.messages.len() + 1);
        if !data_sources.is_empty() {
            let listing: Vec<String> = data_sources.iter().map(ToString::to_string).collect();
            messages.push(Message::system(format!(
                "The user has attached the following data sources:\n{}",
                listing.join("\n")
            )));
        }
        messages.extend(body.messages.iter().cloned());

        let request = ProviderRequest {
            model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stop: vec![],
        };

        debug!(model = %request.model, messages = request.messages.len(), "Prompting");
        let response = self.provider.complete(request).await;

        // Response boundary: anything still queued goes out now.
        self.status.flush();

        Ok(response?.message.content)
    }

    async fn prompt_for_choice(
        &self,
        request: ChoiceRequest,
        options: &[String],
        hints: &[String],
    ) -> Result<String, ProviderError> {
        let mut instruction = format!(
            "Respond with exactly one of the following options and nothing else: {}",
            options.join(", ")
        );
        if !hints.is_empty() {
            instruction.push_str("\n\nHints:");
            for hint in hints {
                instruction.push_str("\n- ");
                instruction.push_str(hint);
            }
        }

        let mut messages = request.messages;
        messages.push(Message::system(instruction));

        let provider_request = ProviderRequest {
            model: request.model,
            messages,
            temperature: self.choice_temperature,
            max_tokens: self.choice_max_tokens,
            stop: vec![],
        };

        debug!(model = %provider_request.model, options = options.len(), "Prompting for choice");
        let response = self.provider.complete(provider_request).await?;
        let reply = response.message.content;

        match match_option(&reply, options) {
            Some(option) => Ok(option.clone()),
            None => {
                warn!(reply = %reply, "Choice reply matched none of the options");
                Ok(clean_reply(&reply).to_string())
            }
        }
    }

    fn send_status(&self, event: StatusEvent) {
        self.status.send(event);
    }

    fn force_flush(&self) {
        self.status.flush();
    }
}

fn clean_reply(reply: &str) -> &str {
    reply
        .trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '.' | '*'))
        .trim()
}

/// Map a free-text reply onto one of `options`.
///
/// Tries an exact match, then a case-insensitive one, then the longest
/// option mentioned anywhere in the reply.
fn match_option<'a>(reply: &str, options: &'a [String]) -> Option<&'a String> {
    let cleaned = clean_reply(reply);

    if let Some(option) = options.iter().find(|o| o.as_str() == cleaned) {
        return Some(option);
    }

    if let Some(option) = options.iter().find(|o| o.eq_ignore_ascii_case(cleaned)) {
        return Some(option);
    }

    let lowered = cleaned.to_lowercase();
    options
        .iter()
        .filter(|o| !o.is_empty() && lowered.contains(&o.to_lowercase()))
        .max_by_key(|o| o.len())
}
