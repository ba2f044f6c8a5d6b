//! Theme system

use ratatui::prelude::*;
use tracing::warn;

/// Application theme
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Title bar background
    pub title_bg: Color,
    /// Status bar background
    pub status_bg: Color,
    /// Bar foreground
    pub bar_fg: Color,
    /// Background of the selected row
    pub selected_bg: Color,
    /// Author names
    pub author: Color,
    /// Comment text
    pub text: Color,
    /// Positive scores
    pub upvote: Color,
    /// Negative scores
    pub downvote: Color,
    /// Zero scores and metadata
    pub muted: Color,
    /// Collapsed markers
    pub collapsed: Color,
    /// Editor border
    pub editor_border: Color,
    /// Help popup border
    pub help_border: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title_bg: Color::Blue,
            status_bg: Color::DarkGray,
            bar_fg: Color::White,
            selected_bg: Color::DarkGray,
            author: Color::Cyan,
            text: Color::White,
            upvote: Color::LightRed,
            downvote: Color::LightBlue,
            muted: Color::Gray,
            collapsed: Color::Yellow,
            editor_border: Color::Yellow,
            help_border: Color::Cyan,
        }
    }
}

impl Theme {
    /// Theme without colors beyond the terminal defaults
    pub fn monochrome() -> Self {
        Self {
            title_bg: Color::Reset,
            status_bg: Color::Reset,
            bar_fg: Color::Reset,
            selected_bg: Color::Reset,
            author: Color::Reset,
            text: Color::Reset,
            upvote: Color::Reset,
            downvote: Color::Reset,
            muted: Color::Reset,
            collapsed: Color::Reset,
            editor_border: Color::Reset,
            help_border: Color::Reset,
        }
    }

    /// Look a theme up by its config name; unknown names fall back to the default
    pub fn from_name(name: &str) -> Self {
        match name {
            "default" => Self::default(),
            "monochrome" | "mono" => Self::monochrome(),
            other => {
                warn!("Unknown theme {:?}, using default", other);
                Self::default()
            }
        }
    }

    /// Color for a net score
    pub fn score_color(&self, score: i64) -> Color {
        match score {
            s if s > 0 => self.upvote,
            s if s < 0 => self.downvote,
            _ => self.muted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name("mono"), Theme::monochrome());
        assert_eq!(Theme::from_name("nope"), Theme::default());
    }

    #[test]
    fn test_score_color() {
        let theme = Theme::default();
        assert_eq!(theme.score_color(3), theme.upvote);
        assert_eq!(theme.score_color(-1), theme.downvote);
        assert_eq!(theme.score_color(0), theme.muted);
    }
}
