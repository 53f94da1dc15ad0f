//! The assistant registry.
//!
//! An ordered, read-only-after-construction list of assistants. The default
//! assistant is injected at construction and always sits first, so every
//! registry has a fallback.

use std::sync::LazyLock;

use concierge_config::AppConfig;
use concierge_core::error::RegistryError;

use crate::assistant::Assistant;

#[derive(Debug, Clone)]
pub struct AssistantRegistry {
    /// Index 0 is the default assistant.
    assistants: Vec<Assistant>,
}

impl AssistantRegistry {
    /// A registry holding only `default`.
    pub fn new(default: Assistant) -> Self {
        Self {
            assistants: vec![default],
        }
    }

    /// The built-in set: default, CSV, SQL.
    pub fn builtin() -> Self {
        Self {
            assistants: vec![Assistant::default_assistant(), Assistant::csv(), Assistant::sql()],
        }
    }

    /// The built-in set extended with the assistants declared in `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, RegistryError> {
        let mut registry = Self::builtin();
        for assistant in &config.assistants {
            registry.register(Assistant::from(assistant))?;
        }
        Ok(registry)
    }

    /// Append an assistant. Names must be non-empty and unique.
    pub fn register(&mut self, assistant: Assistant) -> Result<(), RegistryError> {
        if assistant.name.trim().is_empty() {
            return Err(RegistryError::InvalidName(assistant.name));
        }
        if self.get(&assistant.name).is_some() {
            return Err(RegistryError::DuplicateName(assistant.name));
        }
        tracing::debug!(name = %assistant.name, "Registered assistant");
        self.assistants.push(assistant);
        Ok(())
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, assistant: Assistant) -> Result<Self, RegistryError> {
        self.register(assistant)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Assistant> {
        self.assistants.iter().find(|a| a.name == name)
    }

    pub fn default_assistant(&self) -> &Assistant {
        &self.assistants[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Assistant> {
        self.assistants.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.assistants.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.assistants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assistants.is_empty()
    }
}

impl Default for AssistantRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

static BUILTIN: LazyLock<AssistantRegistry> = LazyLock::new(AssistantRegistry::builtin);

/// The process-wide built-in registry, used when a caller supplies none.
pub fn builtin_registry() -> &'static AssistantRegistry {
    &BUILTIN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::{AssistantKind, CustomAssistant};
    use concierge_config::AssistantConfig;

    #[test]
    fn builtin_order_and_default() {
        let registry = AssistantRegistry::builtin();
        assert_eq!(registry.names(), vec!["default", "csv", "sql"]);
        assert!(matches!(registry.default_assistant().kind, AssistantKind::Default));
        assert!(!registry.is_empty());
    }

    #[test]
    fn new_registry_holds_only_default() {
        let registry = AssistantRegistry::new(Assistant::default_assistant());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.default_assistant().name, "default");
    }

    #[test]
    fn substituted_default_is_first() {
        let mut default = Assistant::default_assistant();
        default.name = "general".into();
        let registry = AssistantRegistry::new(default).with(Assistant::csv()).unwrap();
        assert_eq!(registry.default_assistant().name, "general");
        assert_eq!(registry.names(), vec!["general", "csv"]);
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut registry = AssistantRegistry::builtin();
        let err = registry.register(Assistant::csv()).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName(name) if name == "csv"));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn empty_name_rejected() {
        let mut registry = AssistantRegistry::builtin();
        let err = registry
            .register(Assistant::custom("  ", "Blank", "", CustomAssistant::default()))
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidName(_)));
    }

    #[test]
    fn from_config_appends_custom_assistants() {
        let config = AppConfig {
            assistants: vec![AssistantConfig {
                name: "reports".into(),
                display_name: Some("Report Writer".into()),
                description: "Summaries".into(),
                data_source_types: vec!["pdf".into()],
                models: vec![],
                instructions: None,
            }],
            ..AppConfig::default()
        };
        let registry = AssistantRegistry::from_config(&config).unwrap();
        assert_eq!(registry.names(), vec!["default", "csv", "sql", "reports"]);
        assert_eq!(registry.get("reports").unwrap().display_name, "Report Writer");
    }

    #[test]
    fn builtin_registry_is_shared() {
        assert!(std::ptr::eq(builtin_registry(), builtin_registry()));
        assert!(builtin_registry().get("csv").is_some());
    }
}
