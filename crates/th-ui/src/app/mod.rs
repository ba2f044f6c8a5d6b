//! Application state and main app structure

mod browser;
mod state;

pub use browser::ThreadBrowser;
pub use state::{AppMode, AppState};

use crate::render;
use crate::theme::Theme;
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io::{self, Stdout};
use std::time::Duration;

/// Main application: owns the terminal and draws a [`ThreadBrowser`]
pub struct App {
    /// Browser state
    pub browser: ThreadBrowser,
    /// Colors
    theme: Theme,
    /// Terminal
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl App {
    /// Take over the terminal
    pub fn new(browser: ThreadBrowser, theme: Theme) -> Result<Self> {
        // Install panic hook to restore terminal on panic
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            original_hook(panic_info);
        }));

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            browser,
            theme,
            terminal,
        })
    }

    /// Run the main application loop
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.draw()?;

            if event::poll(Duration::from_millis(100))? {
                if let event::Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.browser.handle_key(key);
                    }
                }
            }

            if self.browser.state.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let browser = &self.browser;
        let theme = &self.theme;
        self.terminal
            .draw(|frame| render::draw(frame, browser, theme))?;
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }
}
