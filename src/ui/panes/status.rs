//! Status bar rendering with keybindings and state indicators

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// What the status bar shows
pub struct StatusRenderData<'a> {
    pub message: &'a str,
    /// 0-based index of the current statement
    pub current: usize,
    pub total: usize,
}

/// Render the status bar at the bottom.
pub fn render_status_bar(frame: &mut Frame, area: Rect, data: &StatusRenderData) {
    // Split status bar into left and right
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    // Left side: statement position and status
    let position_text = if data.total == 0 {
        " Statement 0/0 ".to_string()
    } else {
        format!(" Statement {}/{} ", data.current + 1, data.total)
    };

    let left_spans = vec![
        Span::styled(
            position_text,
            Style::default()
                .bg(DEFAULT_THEME.primary)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " | ",
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.comment),
        ),
        Span::styled(
            format!(" {} ", data.message),
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.fg),
        ),
    ];

    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Left);

    frame.render_widget(left_paragraph, layout[0]);

    // Right side: Keybinds with visual grouping
    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.fg);
    let sep_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.comment);

    let mut right_spans = vec![
        Span::styled(" ←/→ ", key_style),
        Span::styled(" step ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" ↵ / ⌫ ", key_style),
        Span::styled(" end/start ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" ⇥ ", key_style),
        Span::styled(" focus ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled("q", key_style),
        Span::styled(" quit ", desc_style),
    ];

    let is_at_end = data.total > 0 && data.current + 1 >= data.total;
    let is_at_start = data.current == 0;

    if is_at_end {
        right_spans.push(Span::styled("│", sep_style));
        right_spans.push(Span::styled(
            " END ",
            Style::default()
                .bg(DEFAULT_THEME.error)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ));
    } else if is_at_start {
        right_spans.push(Span::styled("│", sep_style));
        right_spans.push(Span::styled(
            " START ",
            Style::default()
                .bg(DEFAULT_THEME.success)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Right);

    frame.render_widget(right_paragraph, layout[1]);
}
