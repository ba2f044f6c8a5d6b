//! Browse command
//!
//! Open a thread in the interactive browser.

use super::context::{parse_post_id, AppContext};
use super::GlobalArgs;
use anyhow::Result;
use clap::Args;
use th_core::store::AuthState;
use th_ui::{App, Theme, ThreadBrowser};

/// Arguments for the browse command
#[derive(Debug, Args)]
pub struct BrowseArgs {
    /// Post ID
    pub post_id: String,

    /// Color theme (overrides ui.theme)
    #[arg(long)]
    pub theme: Option<String>,
}

/// Execute the browse command
pub fn execute(global: &GlobalArgs, args: BrowseArgs) -> Result<()> {
    let ctx = AppContext::load(global)?;
    let post_id = parse_post_id(&args.post_id)?;

    // load before touching the terminal so errors print normally
    let browser = ThreadBrowser::open(ctx.forum.clone(), post_id, ctx.auth.current_user())?;

    let theme = if global.no_color {
        Theme::monochrome()
    } else {
        Theme::from_name(args.theme.as_deref().unwrap_or(&ctx.config.ui.theme))
    };

    let mut app = App::new(browser, theme)?;
    app.run()
}
