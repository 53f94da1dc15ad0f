//! Assistant selection for Concierge.
//!
//! Given a request, its data sources and the active model, pick the
//! registered assistant best suited to answer:
//!
//! 1. **Filter** the registry down to assistants whose capabilities accept
//!    the data sources and the model
//! 2. **Short-circuit** when only one is eligible
//! 3. **Ask the LLM** to choose among several, constrained to their names
//! 4. **Resolve** the answer against the registry, falling back to the
//!    default assistant
//!
//! Progress is reported through the `Llm` collaborator's status channel.

pub mod arbiter;
pub mod assistant;
pub mod filter;
pub mod handler;
pub mod prompt;
pub mod registry;
pub mod selector;

pub use arbiter::{SELECTION_MODEL, choose_assistant_for_request_with_llm};
pub use assistant::{Assistant, AssistantKind, Capabilities, CustomAssistant};
pub use filter::{available_assistants_for_data_sources, eligible_assistants};
pub use handler::extract_sql_query;
pub use prompt::{build_assistant_description_messages, build_data_source_description_messages};
pub use registry::{AssistantRegistry, builtin_registry};
pub use selector::{AssistantSelector, Selection, SelectionState, choose_assistant_for_request};

#[cfg(test)]
pub(crate) mod test_helpers;
