//! Text renderers for the assistant-choice prompt.

use concierge_core::data_source::DataSource;

use crate::assistant::Assistant;

/// One `id: (type)` line per data source; `""` when there are none.
pub fn build_data_source_description_messages(data_sources: &[DataSource]) -> String {
    data_sources
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// One `name - description` line per assistant; `""` when there are none.
pub fn build_assistant_description_messages(assistants: &[&Assistant]) -> String {
    assistants
        .iter()
        .map(|a| format!("{} - {}", a.name, a.description))
        .collect::<Vec<_>>()
        .join("\n")
}
