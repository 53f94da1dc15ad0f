//! Shared test helpers: a scripted LLM collaborator that records every call.

use std::collections::VecDeque;
use std::sync::Mutex;

use concierge_core::data_source::DataSource;
use concierge_core::error::ProviderError;
use concierge_core::llm::{ChoiceRequest, Llm};
use concierge_core::message::{Message, RequestBody};
use concierge_core::status::StatusEvent;

/// One interaction with the collaborator, in call order.
#[derive(Debug, Clone)]
pub enum LlmCall {
    Prompt {
        messages: Vec<Message>,
        data_sources: Vec<DataSource>,
    },
    Choice(ChoiceCall),
    Status(StatusEvent),
    Flush,
}

#[derive(Debug, Clone)]
pub struct ChoiceCall {
    pub model: String,
    pub messages: Vec<Message>,
    pub options: Vec<String>,
    pub hints: Vec<String>,
}

/// An `Llm` that answers from scripted queues.
///
/// Panics if asked for more answers than were scripted.
pub struct RecordingLlm {
    choices: Mutex<VecDeque<Result<String, ProviderError>>>,
    replies: Mutex<VecDeque<Result<String, ProviderError>>>,
    calls: Mutex<Vec<LlmCall>>,
}

impl RecordingLlm {
    pub fn new() -> Self {
        Self {
            choices: Mutex::new(VecDeque::new()),
            replies: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue an answer for the next `prompt_for_choice`.
    pub fn with_choice(self, name: &str) -> Self {
        self.choices.lock().unwrap().push_back(Ok(name.to_string()));
        self
    }

    pub fn with_choice_error(self, err: ProviderError) -> Self {
        self.choices.lock().unwrap().push_back(Err(err));
        self
    }

    /// Queue a reply for the next `prompt`.
    pub fn with_reply(self, text: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(text.to_string()));
        self
    }

    pub fn with_reply_error(self, err: ProviderError) -> Self {
        self.replies.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn calls(&self) -> Vec<LlmCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn choice_calls(&self) -> Vec<ChoiceCall> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                LlmCall::Choice(choice) => Some(choice),
                _ => None,
            })
            .collect()
    }

    pub fn prompt_calls(&self) -> Vec<(Vec<Message>, Vec<DataSource>)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                LlmCall::Prompt {
                    messages,
                    data_sources,
                } => Some((messages, data_sources)),
                _ => None,
            })
            .collect()
    }

    pub fn statuses(&self) -> Vec<StatusEvent> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                LlmCall::Status(event) => Some(event),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: LlmCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl Llm for RecordingLlm {
    async fn prompt(
        &self,
        body: &RequestBody,
        data_sources: &[DataSource],
    ) -> Result<String, ProviderError> {
        self.record(LlmCall::Prompt {
            messages: body.messages.clone(),
            data_sources: data_sources.to_vec(),
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("RecordingLlm: no scripted reply left")
    }

    async fn prompt_for_choice(
        &self,
        request: ChoiceRequest,
        options: &[String],
        hints: &[String],
    ) -> Result<String, ProviderError> {
        self.record(LlmCall::Choice(ChoiceCall {
            model: request.model,
            messages: request.messages,
            options: options.to_vec(),
            hints: hints.to_vec(),
        }));
        self.choices
            .lock()
            .unwrap()
            .pop_front()
            .expect("RecordingLlm: no scripted choice left")
    }

    fn send_status(&self, event: StatusEvent) {
        self.record(LlmCall::Status(event));
    }

    fn force_flush(&self) {
        self.record(LlmCall::Flush);
    }
}
