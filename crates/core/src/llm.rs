//! The LLM collaborator consumed by selection and by assistants.
//!
//! Concierge never talks to a [`Provider`](crate::provider::Provider)
//! directly; it goes through this narrow contract so that hosts can route
//! prompts, constrained choices and status output however they like.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::data_source::DataSource;
use crate::error::ProviderError;
use crate::message::{Message, RequestBody};
use crate::status::StatusEvent;

/// A request for a constrained choice among a fixed set of options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceRequest {
    /// Model that makes the decision.
    pub model: String,

    /// Instruction messages describing the decision.
    pub messages: Vec<Message>,
}

#[async_trait]
pub trait Llm: Send + Sync {
    /// Run the conversation in `body` and return the reply text.
    async fn prompt(
        &self,
        body: &RequestBody,
        data_sources: &[DataSource],
    ) -> Result<String, ProviderError>;

    /// Ask the model to pick one of `options`.
    ///
    /// `hints` are extra disambiguation notes appended to the instruction.
    /// Whether the reply is guaranteed to be one of `options` is up to the
    /// implementation.
    async fn prompt_for_choice(
        &self,
        request: ChoiceRequest,
        options: &[String],
        hints: &[String],
    ) -> Result<String, ProviderError>;

    /// Queue a status event for the end user.
    fn send_status(&self, event: StatusEvent);

    /// Deliver queued status events immediately.
    fn force_flush(&self);
}
