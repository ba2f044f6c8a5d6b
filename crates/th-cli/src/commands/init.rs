//! Init command
//!
//! Initialize threadhub in a directory.

use super::context::PROJECT_DIR;
use super::GlobalArgs;
use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};
use th_core::config::Config;
use th_core::types::UserId;
use th_storage::FileSystemStore;

/// Arguments for the init command
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Force overwrite existing configuration
    #[arg(long)]
    pub force: bool,

    /// Default user to act as
    #[arg(long)]
    pub user: Option<String>,

    /// Directory to initialize (default: current directory)
    #[arg(long)]
    pub path: Option<PathBuf>,
}

/// Execute the init command
pub fn execute(global: &GlobalArgs, args: InitArgs) -> Result<()> {
    use colored::Colorize;

    let project_dir = match args.path.clone() {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    println!("Initializing threadhub in {}...", project_dir.display());

    let threadhub_dir = project_dir.join(PROJECT_DIR);
    let config_path = threadhub_dir.join("config.toml");
    if config_path.exists() && !args.force {
        eprintln!(
            "{} threadhub already initialized. Use --force to reinitialize.",
            "⚠".yellow()
        );
        return Ok(());
    }

    let config = initial_config(args.user.or_else(|| global.user.clone()))?;
    config
        .save(&config_path)
        .context("Failed to write config.toml")?;
    println!("{} Generated {}/config.toml", "✓".green(), PROJECT_DIR);

    let data_dir = threadhub_dir.join("data");
    FileSystemStore::new(&data_dir).context("Failed to create data directory")?;
    println!("{} Created {}/data/", "✓".green(), PROJECT_DIR);

    if project_dir.join(".git").exists() {
        update_gitignore(&project_dir)?;
        println!("{} Updated .gitignore", "✓".green());
    }

    println!("\n{}", "Next steps:".bold());
    if config.identity.user.is_none() {
        println!("  Set identity.user in {}/config.toml, or pass --as <user>", PROJECT_DIR);
    }
    println!(
        "  {}",
        "threadhub post create --title \"Hello\" --body \"First post\"".cyan()
    );

    Ok(())
}

fn initial_config(user: Option<String>) -> Result<Config> {
    let mut config = Config::default();
    if let Some(name) = user {
        let user = UserId::from_string(name).context("Invalid user name")?;
        config.identity.user = Some(user.to_string());
    }
    Ok(config)
}

fn update_gitignore(project_dir: &Path) -> Result<()> {
    let gitignore_path = project_dir.join(".gitignore");
    let entries = format!("\n# threadhub\n{}/data/\n", PROJECT_DIR);

    if gitignore_path.exists() {
        let content = fs::read_to_string(&gitignore_path)?;
        if !content.contains(&format!("{}/data/", PROJECT_DIR)) {
            let mut file = fs::OpenOptions::new()
                .append(true)
                .open(&gitignore_path)?;
            use std::io::Write;
            file.write_all(entries.as_bytes())?;
        }
    } else {
        fs::write(&gitignore_path, entries)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_config_user() {
        let config = initial_config(Some("alice".to_string())).unwrap();
        assert_eq!(config.identity.user.as_deref(), Some("alice"));
        assert!(initial_config(Some("two words".to_string())).is_err());
        assert!(initial_config(None).unwrap().identity.user.is_none());
    }

    #[test]
    fn test_update_gitignore_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join(".gitignore"), "target/\n").unwrap();

        update_gitignore(temp.path()).unwrap();
        update_gitignore(temp.path()).unwrap();

        let content = fs::read_to_string(temp.path().join(".gitignore")).unwrap();
        assert!(content.starts_with("target/\n"));
        assert_eq!(content.matches(".threadhub/data/").count(), 1);
    }

    #[test]
    fn test_init_writes_layout() {
        let temp = tempfile::tempdir().unwrap();
        let args = InitArgs {
            force: false,
            user: Some("bob".to_string()),
            path: Some(temp.path().to_path_buf()),
        };
        execute(&GlobalArgs::default(), args).unwrap();

        let config = Config::load(&temp.path().join(".threadhub/config.toml")).unwrap();
        assert_eq!(config.identity.user.as_deref(), Some("bob"));
        assert!(temp.path().join(".threadhub/data/collections").is_dir());
    }
}
