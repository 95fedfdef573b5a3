use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> Result<()> {
    let path = Config::path()?;
    println!("{} {}", "Config file:".bold(), path.display());
    println!();

    if !path.exists() {
        println!("{}", "No config file yet. Using defaults:".yellow());
        let config = Config::default();
        println!("  defaults.theme: {}", config.theme());
        println!("  defaults.windowed: {}", config.windowed());
        let timing = config.timing();
        println!("  deck.cooldown_ms: {}", timing.cooldown.as_millis());
        println!("  deck.grace_ms: {}", timing.grace.as_millis());
        println!(
            "  deck.construct_delay_ms: {}",
            timing.construct_delay.as_millis()
        );
        return Ok(());
    }

    let config = Config::load_from(&path)?;
    let yaml = serde_yaml::to_string(&config)?;
    print!("{yaml}");
    Ok(())
}

fn set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_or_default();
    config.set(key, value)?;
    let path = config.save()?;
    println!(
        "{} {key} = {value} ({})",
        "Saved".green().bold(),
        path.display().to_string().dimmed()
    );
    Ok(())
}
