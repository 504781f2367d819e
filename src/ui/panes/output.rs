//! Normalized output pane rendering

use crate::ui::panes::{clamp_scroll, pane_block};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Padding},
    Frame,
};

/// Render the normalized output pane.
///
/// `current` is the 0-based line range of the current statement's rendering.
pub fn render_output_pane(
    frame: &mut Frame,
    area: Rect,
    output: &str,
    current: Option<std::ops::Range<usize>>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Normalized ", is_focused).padding(Padding::new(1, 0, 0, 0));

    // Tabs are expanded so nesting stays visible in the terminal
    let lines: Vec<String> = output.lines().map(|l| l.replace('\t', "    ")).collect();
    let visible_height = clamp_scroll(lines.len(), area, scroll_offset);

    let items: Vec<ListItem> = lines
        .into_iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let is_current = current.as_ref().is_some_and(|r| r.contains(&idx));
            let style = if is_current {
                Style::default()
                    .fg(DEFAULT_THEME.fg)
                    .bg(DEFAULT_THEME.current_line_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };
            ListItem::new(Line::from(Span::styled(line, style)))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
