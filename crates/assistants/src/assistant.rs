//! Assistant descriptors and their capability predicates.
//!
//! An [`Assistant`] pairs a unique name and prompt-facing description with
//! an [`AssistantKind`]. The kind decides which requests the assistant can
//! take (via [`Capabilities`]) and how it handles them
//! (see [`Assistant::handle`](crate::handler)).

use concierge_config::AssistantConfig;
use concierge_core::data_source::{DataSource, ModelId};

/// Data-source types the SQL assistant treats as databases.
pub const DATABASE_SOURCE_TYPES: &[&str] = &["sql", "mysql", "sqlite", "postgres", "database"];

/// What an assistant can work with.
pub trait Capabilities {
    /// Whether the assistant can handle a request carrying these data sources.
    fn handles_data_sources(&self, data_sources: &[DataSource]) -> bool;

    /// Whether the assistant can run with this model.
    fn handles_model(&self, model: &ModelId) -> bool;
}

/// A registered assistant. Identity is `name`.
#[derive(Debug, Clone)]
pub struct Assistant {
    /// Unique identifier, also the answer space of the choice call.
    pub name: String,
    /// Label shown to the end user.
    pub display_name: String,
    /// Free text shown to the model when choosing.
    pub description: String,
    pub kind: AssistantKind,
}

/// The assistant variants.
#[derive(Debug, Clone)]
pub enum AssistantKind {
    /// Takes anything. Every registry has one.
    Default,
    /// Spreadsheet analysis over CSV files.
    Csv,
    /// Writes SQL queries against attached databases.
    Sql,
    /// Declared in configuration.
    Custom(CustomAssistant),
}

/// Declarative capabilities of a configured assistant.
#[derive(Debug, Clone, Default)]
pub struct CustomAssistant {
    /// Accepted data-source types. Empty accepts any.
    pub data_source_types: Vec<String>,
    /// Accepted models. Empty accepts any.
    pub models: Vec<String>,
    /// System instructions prepended to the conversation.
    pub instructions: Option<String>,
}

impl Assistant {
    /// The general-purpose fallback assistant.
    pub fn default_assistant() -> Self {
        Self {
            name: "default".into(),
            display_name: "Default Assistant".into(),
            description: "A general purpose assistant that can help with a wide variety of tasks, \
                          including questions about any attached documents."
                .into(),
            kind: AssistantKind::Default,
        }
    }

    pub fn csv() -> Self {
        Self {
            name: "csv".into(),
            display_name: "CSV Assistant".into(),
            description: "Analyzes CSV files: computes totals, averages, groupings and other \
                          tabular answers. Only useful when every data source is a CSV file."
                .into(),
            kind: AssistantKind::Csv,
        }
    }

    pub fn sql() -> Self {
        Self {
            name: "sql".into(),
            display_name: "SQL Assistant".into(),
            description: "Writes SQL queries that answer questions about attached databases.".into(),
            kind: AssistantKind::Sql,
        }
    }

    pub fn custom(
        name: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        capabilities: CustomAssistant,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            description: description.into(),
            kind: AssistantKind::Custom(capabilities),
        }
    }
}

impl From<&AssistantConfig> for Assistant {
    fn from(config: &AssistantConfig) -> Self {
        let name = config.name.trim().to_string();
        let display_name = config.display_name.clone().unwrap_or_else(|| name.clone());
        Self::custom(
            name,
            display_name,
            &config.description,
            CustomAssistant {
                data_source_types: config.data_source_types.clone(),
                models: config.models.clone(),
                instructions: config.instructions.clone(),
            },
        )
    }
}

impl Capabilities for AssistantKind {
    fn handles_data_sources(&self, data_sources: &[DataSource]) -> bool {
        match self {
            Self::Default => true,
            Self::Csv => {
                !data_sources.is_empty() && data_sources.iter().all(|ds| ds.is_kind("csv"))
            }
            Self::Sql => {
                !data_sources.is_empty()
                    && data_sources
                        .iter()
                        .all(|ds| DATABASE_SOURCE_TYPES.iter().any(|t| ds.is_kind(t)))
            }
            Self::Custom(custom) => {
                custom.data_source_types.is_empty()
                    || (!data_sources.is_empty()
                        && data_sources
                            .iter()
                            .all(|ds| custom.data_source_types.iter().any(|t| ds.is_kind(t))))
            }
        }
    }

    fn handles_model(&self, model: &ModelId) -> bool {
        match self {
            Self::Default | Self::Csv | Self::Sql => true,
            Self::Custom(custom) => {
                custom.models.is_empty() || custom.models.iter().any(|m| m == model.as_str())
            }
        }
    }
}

impl Capabilities for Assistant {
    fn handles_data_sources(&self, data_sources: &[DataSource]) -> bool {
        self.kind.handles_data_sources(data_sources)
    }

    fn handles_model(&self, model: &ModelId) -> bool {
        self.kind.handles_model(model)
    }
}
