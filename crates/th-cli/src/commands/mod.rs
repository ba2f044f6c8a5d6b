//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod browse;
pub mod comment;
pub mod config;
pub mod context;
pub mod export;
pub mod init;
pub mod post;
pub mod thread;
pub mod vote;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// threadhub - threaded discussions in the terminal
#[derive(Debug, Parser)]
#[command(name = "threadhub")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "THREADHUB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Act as this user
    #[arg(long = "as", value_name = "USER", global = true, env = "THREADHUB_USER")]
    pub user: Option<String>,

    /// Data directory (overrides storage.data_dir)
    #[arg(long, global = true, env = "THREADHUB_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Keep everything in memory; nothing is written
    #[arg(long, global = true)]
    pub ephemeral: bool,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Initialize threadhub in the current directory
    Init(init::InitArgs),

    /// Create, list and manage posts
    #[command(subcommand)]
    Post(post::PostCommand),

    /// Comment on posts and reply to comments
    #[command(subcommand)]
    Comment(comment::CommentCommand),

    /// Vote on a post or comment (same vote again removes it)
    Vote(vote::VoteArgs),

    /// Print a post with its comment tree
    Thread(thread::ThreadArgs),

    /// Export a thread
    Export(export::ExportArgs),

    /// Browse a thread interactively
    Browse(browse::BrowseArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Run the CLI application
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // the browser owns the terminal; log lines would corrupt the screen
    if !matches!(cli.command, Commands::Browse(_)) {
        setup_logging(cli.global.verbose);
    }

    if cli.global.no_color {
        colored::control::set_override(false);
    }

    let global = cli.global;
    match cli.command {
        Commands::Init(args) => init::execute(&global, args),
        Commands::Post(cmd) => post::execute(&global, cmd),
        Commands::Comment(cmd) => comment::execute(&global, cmd),
        Commands::Vote(args) => vote::execute(&global, args),
        Commands::Thread(args) => thread::execute(&global, args),
        Commands::Export(args) => export::execute(&global, args),
        Commands::Browse(args) => browse::execute(&global, args),
        Commands::Config(cmd) => config::execute(&global, cmd),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_text() {
        let cmd = Cli::command();
        assert!(cmd.get_about().is_some());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "threadhub",
            "post",
            "list",
            "--as",
            "alice",
            "--data-dir",
            "/tmp/th",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.global.user.as_deref(), Some("alice"));
        assert_eq!(cli.global.verbose, 2);
        assert_eq!(cli.global.data_dir, Some(PathBuf::from("/tmp/th")));
    }
}
