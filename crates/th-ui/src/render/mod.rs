//! Drawing functions
//!
//! Pure functions of the browser state; nothing here mutates it.

use crate::app::{AppMode, ThreadBrowser};
use crate::theme::Theme;
use ratatui::{prelude::*, widgets::*};
use th_core::thread::ThreadRow;

/// Draw the whole screen
pub fn draw(frame: &mut Frame, browser: &ThreadBrowser, theme: &Theme) {
    let area = frame.area();
    let editing = browser.state.mode == AppMode::Reply;

    let constraints = if editing {
        vec![
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ]
    } else {
        vec![Constraint::Length(1), Constraint::Min(3), Constraint::Length(1)]
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_title_bar(frame, chunks[0], browser, theme);
    render_thread(frame, chunks[1], browser, theme);
    if editing {
        render_editor(frame, chunks[2], browser, theme);
        render_status_bar(frame, chunks[3], browser, theme);
    } else {
        render_status_bar(frame, chunks[2], browser, theme);
    }

    if browser.state.mode == AppMode::Help {
        render_help(frame, area, theme);
    }
}

fn render_title_bar(frame: &mut Frame, area: Rect, browser: &ThreadBrowser, theme: &Theme) {
    let post = &browser.thread().post;
    let title = if post.deleted { "[deleted]" } else { post.title.as_str() };
    let mut text = format!(" c/{} · {}", post.community, title);
    if browser.show_scores() {
        text.push_str(&format!(" · {} points", post.score()));
    }
    text.push_str(&format!(" · {} comments", post.comment_count));

    frame.render_widget(
        Paragraph::new(text).style(
            Style::default()
                .bg(theme.title_bg)
                .fg(theme.bar_fg)
                .add_modifier(Modifier::BOLD),
        ),
        area,
    );
}

/// Lines of one comment row
fn row_lines<'a>(
    row: &'a ThreadRow,
    selected: bool,
    show_scores: bool,
    theme: &Theme,
) -> Vec<Line<'a>> {
    let indent = row.indent_str();
    let marker = if row.collapsed {
        "[+]"
    } else if row.reply_count > 0 {
        "[-]"
    } else {
        " • "
    };
    let base = if selected {
        Style::default().bg(theme.selected_bg)
    } else {
        Style::default()
    };

    let mut header = vec![
        Span::styled(indent.clone(), base),
        Span::styled(format!("{} ", marker), base.fg(theme.collapsed)),
        Span::styled(
            row.author.to_string(),
            base.fg(theme.author).add_modifier(Modifier::BOLD),
        ),
    ];
    if show_scores {
        header.push(Span::styled(
            format!("  {} points", row.score),
            base.fg(theme.score_color(row.score)),
        ));
    }
    header.push(Span::styled(
        format!("  {}", row.created_at.format("%Y-%m-%d %H:%M")),
        base.fg(theme.muted),
    ));
    if row.collapsed {
        header.push(Span::styled(
            format!("  ({} hidden)", row.hidden_count),
            base.fg(theme.collapsed),
        ));
    }

    let body_style = if row.deleted {
        base.fg(theme.muted).add_modifier(Modifier::ITALIC)
    } else {
        base.fg(theme.text)
    };

    let mut lines = vec![Line::from(header)];
    for text in row.body.lines() {
        lines.push(Line::from(vec![
            Span::styled(format!("{}    ", indent), base),
            Span::styled(text, body_style),
        ]));
    }
    if selected && row.show_actions {
        lines.push(Line::from(Span::styled(
            format!("{}    [u]p [d]own [r]eply [x] delete", indent),
            Style::default().fg(theme.muted),
        )));
    }
    if row.reply_open {
        lines.push(Line::from(Span::styled(
            format!("{}    ↳ replying…", indent),
            Style::default().fg(theme.editor_border),
        )));
    }
    lines
}

fn render_thread(frame: &mut Frame, area: Rect, browser: &ThreadBrowser, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.muted));

    if browser.rows().is_empty() {
        frame.render_widget(
            Paragraph::new("No comments yet. Press c to write one.").block(block),
            area,
        );
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    let mut selected_line = 0;
    for (i, row) in browser.rows().iter().enumerate() {
        let selected = i == browser.state.cursor;
        if selected {
            selected_line = lines.len();
        }
        lines.extend(row_lines(row, selected, browser.show_scores(), theme));
    }

    // keep the selected row near the bottom edge once it would scroll off
    let height = area.height.saturating_sub(2) as usize;
    let scroll = (selected_line + 3).saturating_sub(height);

    frame.render_widget(
        Paragraph::new(lines).block(block).scroll((scroll as u16, 0)),
        area,
    );
}

fn render_editor(frame: &mut Frame, area: Rect, browser: &ThreadBrowser, theme: &Theme) {
    let state = &browser.state;
    let title = match &state.reply_target {
        Some(_) => "Reply (Enter to post, Esc to cancel)",
        None => "Comment on post (Enter to post, Esc to cancel)",
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.editor_border));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new(state.editor_content.as_str()).style(Style::default().fg(theme.text)),
        inner,
    );

    // CJK characters take two columns
    let display_width: usize = state
        .editor_content
        .chars()
        .take(state.editor_cursor)
        .map(|c| if c.is_ascii() { 1 } else { 2 })
        .sum();
    let cursor_x = inner
        .x
        .saturating_add(display_width as u16)
        .min(inner.x + inner.width.saturating_sub(1));
    frame.set_cursor_position((cursor_x, inner.y));
}

fn render_status_bar(frame: &mut Frame, area: Rect, browser: &ThreadBrowser, theme: &Theme) {
    let state = &browser.state;
    let mode = match state.mode {
        AppMode::Normal => "NORMAL",
        AppMode::Reply => "REPLY",
        AppMode::Help => "HELP",
    };

    let text = state.message.clone().unwrap_or_else(|| {
        let user = browser
            .user()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "anonymous".to_string());
        format!(
            " {} | {}/{} | {} | ? for help ",
            mode,
            (state.cursor + 1).min(browser.rows().len()),
            browser.rows().len(),
            user
        )
    });

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(theme.status_bg).fg(theme.bar_fg)),
        area,
    );
}

fn render_help(frame: &mut Frame, area: Rect, theme: &Theme) {
    let heading = Style::default().fg(theme.collapsed);
    let text = vec![
        Line::from(Span::styled("threadhub", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled("Navigation", heading)),
        Line::from("  j/k         Move down/up"),
        Line::from("  g/G         Go to top/bottom"),
        Line::from("  space/enter Toggle replies"),
        Line::from(""),
        Line::from(Span::styled("Discussion", heading)),
        Line::from("  r           Reply to selected comment"),
        Line::from("  c           Comment on the post"),
        Line::from("  u/d         Upvote/downvote (again to undo)"),
        Line::from("  x           Delete your comment"),
        Line::from(""),
        Line::from(Span::styled("Other", heading)),
        Line::from("  R           Reload"),
        Line::from("  q           Quit"),
        Line::from("  ?           Show this help"),
        Line::from(""),
        Line::from(Span::styled("Press any key to close", Style::default().fg(theme.muted))),
    ];

    let help_area = centered_rect(50, 70, area);
    frame.render_widget(Clear, help_area);
    frame.render_widget(
        Paragraph::new(text).block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.help_border)),
        ),
        help_area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup[1])[1]
}
