//! Assistant selection: the top-level entry point.
//!
//! # Flow
//!
//! ```text
//!  Idle ──progress status + flush──▶ Choosing ──lookup──▶ Resolved
//!                                       │
//!                 one eligible ─────────┤ take it
//!                 several eligible ─────┘ ask the LLM (one call)
//! ```
//!
//! The chosen name is looked up in the *whole* registry; a name that is not
//! registered falls back to the default assistant. Exiting emits a closing
//! status event followed by a sticky announcement of the assistant.

use std::time::{Duration, Instant};

use concierge_core::data_source::{DataSource, ModelId};
use concierge_core::error::Result;
use concierge_core::llm::Llm;
use concierge_core::message::RequestBody;
use concierge_core::status::StatusEvent;
use tracing::{debug, info, warn};

use crate::arbiter::{self, SELECTION_MODEL};
use crate::assistant::Assistant;
use crate::filter::eligible_assistants;
use crate::registry::{AssistantRegistry, builtin_registry};

/// Message shown while the choice is being made.
pub const CHOOSING_MESSAGE: &str = "Choosing an assistant to help";

/// Icon attached to the announcement of the chosen assistant.
pub const ANNOUNCEMENT_ICON: &str = "assistant";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Idle,
    Choosing,
    Resolved,
}

impl SelectionState {
    fn advance(&mut self, next: SelectionState) {
        debug!(from = ?self, to = ?next, "Selection state");
        *self = next;
    }
}

/// Outcome of a selection.
#[derive(Debug, Clone)]
pub struct Selection<'r> {
    /// The assistant that will answer.
    pub assistant: &'r Assistant,
    /// The name that was chosen, before resolution.
    pub chosen_name: String,
    /// Number of eligible assistants.
    pub candidates: usize,
    /// Time spent in the choice call, if one was made.
    pub llm_elapsed: Option<Duration>,
}

impl Selection<'_> {
    /// Whether the chosen name was unknown and the default stepped in.
    pub fn fell_back(&self) -> bool {
        self.assistant.name != self.chosen_name
    }
}

/// Picks the assistant for a request from a registry.
pub struct AssistantSelector<'r> {
    registry: &'r AssistantRegistry,
    selection_model: String,
}

impl<'r> AssistantSelector<'r> {
    pub fn new(registry: &'r AssistantRegistry) -> Self {
        Self {
            registry,
            selection_model: SELECTION_MODEL.to_string(),
        }
    }

    /// Use `model` for the choice call.
    pub fn with_selection_model(mut self, model: impl Into<String>) -> Self {
        self.selection_model = model.into();
        self
    }

    pub fn registry(&self) -> &'r AssistantRegistry {
        self.registry
    }

    /// Choose the assistant for a request.
    ///
    /// Only a failing choice call is reported as an error; every other path
    /// ends with an assistant.
    pub async fn choose(
        &self,
        llm: &dyn Llm,
        model: &ModelId,
        body: &RequestBody,
        data_sources: &[DataSource],
    ) -> Result<&'r Assistant> {
        Ok(self.select(llm, model, body, data_sources).await?.assistant)
    }

    /// Like [`choose`](Self::choose), with details about how the choice was made.
    pub async fn select(
        &self,
        llm: &dyn Llm,
        model: &ModelId,
        body: &RequestBody,
        data_sources: &[DataSource],
    ) -> Result<Selection<'r>> {
        let mut state = SelectionState::Idle;

        // Some hosts hold status output until the response starts; the
        // progress indicator has to show up before the choice call.
        llm.send_status(StatusEvent::progress(CHOOSING_MESSAGE));
        llm.force_flush();
        state.advance(SelectionState::Choosing);

        let eligible = eligible_assistants(self.registry, model, data_sources);

        let (chosen_name, llm_elapsed) = match eligible.as_slice() {
            [] => (self.registry.default_assistant().name.clone(), None),
            [only] => (only.name.clone(), None),
            several => {
                let started = Instant::now();
                let name = arbiter::choose_with_model(
                    llm,
                    &self.selection_model,
                    body,
                    data_sources,
                    several,
                )
                .await?;
                let elapsed = started.elapsed();
                info!(
                    chosen = %name,
                    candidates = several.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Assistant chosen by LLM"
                );
                (name, Some(elapsed))
            }
        };

        let assistant = match self.registry.get(&chosen_name) {
            Some(assistant) => assistant,
            None => {
                let default = self.registry.default_assistant();
                warn!(
                    chosen = %chosen_name,
                    fallback = %default.name,
                    "Chosen assistant is not registered, using the default"
                );
                default
            }
        };
        state.advance(SelectionState::Resolved);

        llm.send_status(StatusEvent::done());
        llm.send_status(
            StatusEvent::new(false)
                .with_message(format!("The \"{}\" is responding.", assistant.display_name))
                .with_icon(ANNOUNCEMENT_ICON)
                .sticky(true),
        );

        info!(assistant = %assistant.name, candidates = eligible.len(), "Assistant selected");

        Ok(Selection {
            assistant,
            chosen_name,
            candidates: eligible.len(),
            llm_elapsed,
        })
    }
}

/// Choose the assistant for a request from `assistants`, or from the
/// built-in registry when none is given.
pub async fn choose_assistant_for_request<'r>(
    llm: &dyn Llm,
    model: &ModelId,
    body: &RequestBody,
    data_sources: &[DataSource],
    assistants: Option<&'r AssistantRegistry>,
) -> Result<&'r Assistant> {
    let registry = assistants.unwrap_or_else(|| builtin_registry());
    AssistantSelector::new(registry)
        .choose(llm, model, body, data_sources)
        .await
}
