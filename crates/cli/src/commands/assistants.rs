//! `concierge assistants`: List registered assistants.

use concierge_assistants::{AssistantRegistry, eligible_assistants};
use concierge_config::AppConfig;
use concierge_core::data_source::{DataSource, ModelId};

pub async fn run(
    sources: Vec<DataSource>,
    model: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let registry = AssistantRegistry::from_config(&config)?;
    let model = ModelId::new(model.unwrap_or_else(|| config.default_model.clone()));

    let eligible: Vec<&str> = eligible_assistants(&registry, &model, &sources)
        .iter()
        .map(|a| a.name.as_str())
        .collect();

    println!("Assistants (model: {model})");
    if !sources.is_empty() {
        let listed: Vec<String> = sources.iter().map(ToString::to_string).collect();
        println!("Data sources: {}", listed.join(", "));
    }
    println!();

    for assistant in registry.iter() {
        let mark = if eligible.contains(&assistant.name.as_str()) {
            "✓"
        } else {
            " "
        };
        println!("  {mark} {:<12} {}", assistant.name, assistant.display_name);
        if !assistant.description.is_empty() {
            println!("      {}", assistant.description);
        }
    }

    println!();
    println!("  {}", candidate_summary(&eligible, &registry.default_assistant().name));

    Ok(())
}

/// What selection will do with `eligible`.
fn candidate_summary(eligible: &[&str], default: &str) -> String {
    match eligible {
        [] => format!("No assistant accepts these sources; {default} answers without a choice call."),
        [only] => format!("{only} is the only candidate; no choice call needed."),
        several => format!("{} candidates; the choice call decides.", several.len()),
    }
}
