//! Token pane rendering: the current statement's tokens and a kind histogram

use crate::parser::lexer::{Token, TokenKind};
use crate::ui::panes::source::token_style;
use crate::ui::panes::{clamp_scroll, pane_block};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Padding},
    Frame,
};
use rustc_hash::FxHashMap;

/// Render the tokens pane
pub fn render_tokens_pane(
    frame: &mut Frame,
    area: Rect,
    tokens: &[Token],
    histogram: &FxHashMap<TokenKind, usize>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Tokens ", is_focused).padding(Padding::new(1, 0, 0, 0));

    let mut lines: Vec<Line> = tokens
        .iter()
        .map(|token| {
            Line::from(vec![
                Span::styled(
                    format!("{:<15}", token.kind.name()),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(token.text.clone(), token_style(token.kind)),
                Span::styled(
                    format!("  @{}:{}", token.location.line, token.location.column),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
            ])
        })
        .collect();

    // Whole-program summary, most frequent kinds first
    let mut counts: Vec<(TokenKind, usize)> = histogram.iter().map(|(k, n)| (*k, *n)).collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.name().cmp(b.0.name())));

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Program totals",
        Style::default()
            .fg(DEFAULT_THEME.primary)
            .add_modifier(Modifier::BOLD),
    )));
    lines.extend(counts.into_iter().map(|(kind, count)| {
        Line::from(vec![
            Span::styled(format!("{:<15}", kind.name()), token_style(kind)),
            Span::styled(count.to_string(), Style::default().fg(DEFAULT_THEME.fg)),
        ])
    }));

    let visible_height = clamp_scroll(lines.len(), area, scroll_offset);
    let items: Vec<ListItem> = lines
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(ListItem::new)
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
