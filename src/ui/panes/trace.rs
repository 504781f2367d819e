//! Parse trace pane rendering

use crate::parser::trace::TraceEvent;
use crate::ui::panes::{clamp_scroll, pane_block};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the parse trace pane
pub fn render_trace_pane(
    frame: &mut Frame,
    area: Rect,
    events: &[TraceEvent],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Parse Trace ", is_focused);

    if events.is_empty() {
        let paragraph = Paragraph::new("(tracing off, run with --trace)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let visible_height = clamp_scroll(events.len(), area, scroll_offset);

    let items: Vec<ListItem> = events
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|event| ListItem::new(event.to_string()).style(Style::default().fg(DEFAULT_THEME.fg)))
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
