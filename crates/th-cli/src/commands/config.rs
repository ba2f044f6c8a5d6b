//! Config command
//!
//! Manage threadhub configuration.

use super::context::config_path;
use super::GlobalArgs;
use anyhow::{Context, Result};
use clap::Subcommand;
use std::fs;
use std::path::Path;
use th_core::config::Config;

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the configuration file path
    Path,

    /// Reset to default configuration
    Reset {
        /// Force reset without confirmation
        #[arg(long)]
        force: bool,
    },

    /// Validate configuration
    Validate,
}

/// Execute the config command
pub fn execute(global: &GlobalArgs, cmd: ConfigCommand) -> Result<()> {
    let path = config_path(global);
    match cmd {
        ConfigCommand::Show { json } => show_config(&path, json),
        ConfigCommand::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigCommand::Reset { force } => reset_config(&path, force),
        ConfigCommand::Validate => validate_config(&path),
    }
}

fn show_config(path: &Path, as_json: bool) -> Result<()> {
    use colored::Colorize;

    if !path.exists() {
        eprintln!(
            "{} No configuration at {}, showing defaults. Run '{}' to create one.",
            "⚠".yellow(),
            path.display(),
            "threadhub init".cyan()
        );
    }

    let config = Config::load(path)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        println!("{}", "Configuration:".bold().underline());
        println!("{}", path.display().to_string().dimmed());
        println!();
        println!("{}", toml::to_string_pretty(&config)?);
    }

    Ok(())
}

fn reset_config(path: &Path, force: bool) -> Result<()> {
    use colored::Colorize;

    if !force {
        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt("Reset configuration to defaults?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Reset cancelled.");
            return Ok(());
        }
    }

    if path.exists() {
        let backup_path = format!(
            "{}.backup-{}",
            path.display(),
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        );
        fs::copy(path, &backup_path)?;
        println!("{} Backed up to {}", "✓".green(), backup_path);
    }

    Config::default()
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("{} Configuration reset to defaults.", "✓".green());
    Ok(())
}

fn validate_config(path: &Path) -> Result<()> {
    use colored::Colorize;

    if !path.exists() {
        anyhow::bail!("Configuration not found at {}", path.display());
    }

    let content = fs::read_to_string(path)?;
    let raw: toml::Value = toml::from_str(&content).context("Invalid TOML")?;
    println!("{} Configuration is valid TOML", "✓".green());

    let config: Config = toml::from_str(&content).context("Invalid configuration")?;
    config.validate()?;
    println!("{} All values in range", "✓".green());

    let known = ["thread", "feed", "storage", "identity", "ui"];
    if let Some(table) = raw.as_table() {
        for key in table.keys().filter(|k| !known.contains(&k.as_str())) {
            println!("{} Unknown section [{}] is ignored", "⚠".yellow(), key);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_config() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        assert!(validate_config(&path).is_err());

        fs::write(&path, "[thread]\nmax_reply_depth = 3\n").unwrap();
        assert!(validate_config(&path).is_err());

        fs::write(&path, "[feed]\ndefault_sort = \"top\"\n[extra]\nx = 1\n").unwrap();
        assert!(validate_config(&path).is_ok());
    }

    #[test]
    fn test_reset_backs_up() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[ui]\ntheme = \"mono\"\n").unwrap();

        reset_config(&path, true).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.ui.theme, "default");
        let backups = fs::read_dir(temp.path())
            .unwrap()
            .filter(|e| {
                e.as_ref()
                    .unwrap()
                    .file_name()
                    .to_string_lossy()
                    .contains(".backup-")
            })
            .count();
        assert_eq!(backups, 1);
    }
}
