//! Export command
//!
//! Export a thread to JSON or Markdown.

use super::context::{parse_post_id, AppContext};
use super::GlobalArgs;
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use th_core::export::ExportManager;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Pretty-printed JSON
    Json,
    /// Single-line JSON
    JsonCompact,
    /// Markdown with quoted replies
    Markdown,
}

impl ExportFormat {
    /// Name the exporter is registered under
    pub fn name(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::JsonCompact => "json-compact",
            ExportFormat::Markdown => "markdown",
        }
    }
}

/// Arguments for the export command
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Post ID
    pub post_id: String,

    /// Export format
    #[arg(long, short, value_enum, default_value = "markdown")]
    pub format: ExportFormat,

    /// Output file path (stdout if not specified)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Execute the export command
pub fn execute(global: &GlobalArgs, args: ExportArgs) -> Result<()> {
    use colored::Colorize;

    let ctx = AppContext::load(global)?;
    let thread = ctx.forum.load_thread(&parse_post_id(&args.post_id)?)?;

    eprintln!(
        "Exporting \"{}\" ({} comments)...",
        thread.post.title.cyan(),
        thread.comment_count().to_string().yellow()
    );

    let manager = ExportManager::new();

    if let Some(path) = args.output {
        let written = manager
            .export_to_file(&thread, args.format.name(), &path)
            .with_context(|| format!("Failed to write to {}", path.display()))?;
        eprintln!("{} Exported to {}", "✓".green(), written.display());
    } else {
        let output = manager.export(&thread, args.format.name())?;
        std::io::stdout()
            .write_all(output.as_bytes())
            .context("Failed to write to stdout")?;
    }

    Ok(())
}
