//! Eligibility filtering: which assistants can take this request.

use concierge_core::data_source::{DataSource, ModelId};

use crate::assistant::{Assistant, Capabilities};
use crate::registry::{AssistantRegistry, builtin_registry};

/// Assistants in `registry` that accept both `data_sources` and `model`,
/// in registry order.
///
/// With no data sources only the default assistant is returned and no
/// predicate is consulted: a plain chat request never needs a choice call.
pub fn eligible_assistants<'r>(
    registry: &'r AssistantRegistry,
    model: &ModelId,
    data_sources: &[DataSource],
) -> Vec<&'r Assistant> {
    if data_sources.is_empty() {
        return vec![registry.default_assistant()];
    }

    registry
        .iter()
        .filter(|a| a.handles_data_sources(data_sources) && a.handles_model(model))
        .collect()
}

/// [`eligible_assistants`] over `assistants`, or the built-in registry.
pub fn available_assistants_for_data_sources<'r>(
    model: &ModelId,
    data_sources: &[DataSource],
    assistants: Option<&'r AssistantRegistry>,
) -> Vec<&'r Assistant> {
    let registry = assistants.unwrap_or_else(|| builtin_registry());
    eligible_assistants(registry, model, data_sources)
}
