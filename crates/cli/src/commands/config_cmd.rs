//! `concierge config`: Configuration management commands.

use std::path::Path;

use concierge_config::AppConfig;

pub async fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            let mut warnings = Vec::new();

            if config.api_key.is_none() {
                warnings.push("No API key set (set CONCIERGE_API_KEY or OPENAI_API_KEY env var)");
            }

            if config.selection.model == config.default_model {
                warnings.push("selection.model equals default_model; the choice call usually warrants a stronger model");
            }

            if warnings.is_empty() {
                println!("   ✅ All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   ⚠️  {w}");
                }
            }

            println!();
            println!("   Provider:         {}", config.default_provider);
            println!("   Model:            {}", config.default_model);
            println!("   Selection model:  {}", config.selection.model);
            println!("   Custom assistants: {}", config.assistants.len());
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if config.api_key.is_some() {
        config.api_key = Some("[REDACTED]".into());
    }
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_dir().join("config.toml");
    if write_default_config(&config_path)? {
        println!("✅ Created config.toml at: {}", config_path.display());
        println!("\n📝 Next steps:");
        println!("   1. Edit {} and add your API key", config_path.display());
        println!("   2. Run: concierge choose -m \"...\" -s data:csv\n");
    } else {
        println!("⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete it and re-run init.");
    }
    Ok(())
}

/// Write the default config to `path` unless a file is already there.
///
/// Returns whether a file was written.
fn write_default_config(path: &Path) -> std::io::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, AppConfig::default_toml())?;
    Ok(true)
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_dir().join("config.toml");
    println!("{}", config_path.display());
    Ok(())
}
