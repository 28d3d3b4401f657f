use crate::models::RsvpConfig;
use crate::Result;
use anyhow::Context;
use colored::Colorize;
use std::path::Path;

/// Write a default config file, asking before replacing an existing one
pub fn run(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        println!(
            "{}",
            format!("⚠️  {} already exists", path.display()).yellow()
        );

        use dialoguer::Confirm;
        let overwrite = Confirm::new()
            .with_prompt("Overwrite with defaults?")
            .default(false)
            .interact()?;

        if !overwrite {
            println!("   Keeping existing config");
            return Ok(());
        }
    }

    let config = RsvpConfig::default();
    config
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("{}", "✅ Config written".green().bold());
    println!();
    println!("   File:     {}", path.display());
    println!("   Endpoint: {}", config.submission.endpoint.bright_black());
    println!("   Store:    {}", config.store_path().display());
    println!();
    println!(
        "   Edit {} and {} for your event.",
        "[event]".cyan(),
        "[submission]".cyan()
    );

    Ok(())
}
