//! Source code pane rendering with syntax highlighting
//!
//! This module renders the source pane, which displays the pseudocode program
//! with highlighting driven by the real token stream and the lines of the
//! current statement marked.
//!
//! # Features
//!
//! - Token-accurate highlighting (keywords, literals, operators, delimiters)
//! - Current statement highlighting with line numbers
//! - Scroll state that keeps the current statement at a fixed visual row

use crate::parser::lexer::{Token, TokenKind};
use crate::ui::panes::pane_block;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use rustc_hash::FxHashMap;

/// Style for one token kind, shared with the tokens pane.
pub fn token_style(kind: TokenKind) -> Style {
    match kind {
        k if k.is_keyword() => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        TokenKind::Number => Style::default().fg(DEFAULT_THEME.number),
        TokenKind::StringLiteral => Style::default().fg(DEFAULT_THEME.string),
        TokenKind::Identifier => Style::default().fg(DEFAULT_THEME.fg),
        TokenKind::Assign => Style::default()
            .fg(DEFAULT_THEME.secondary)
            .add_modifier(Modifier::BOLD),
        TokenKind::LParen
        | TokenKind::RParen
        | TokenKind::LBracket
        | TokenKind::RBracket => Style::default().fg(DEFAULT_THEME.primary), // Brackets
        TokenKind::Colon | TokenKind::Comma => Style::default().fg(DEFAULT_THEME.fg),
        _ => Style::default().fg(DEFAULT_THEME.operator), // Operators
    }
}

/// Highlight one source line using the tokens that start on it.
fn highlight_line<'a>(line: &'a str, tokens: &[&Token]) -> Line<'a> {
    let chars: Vec<char> = line.chars().collect();
    let mut spans = Vec::new();
    let mut cursor = 0;

    for (i, token) in tokens.iter().enumerate() {
        let start = token.location.column.saturating_sub(1).min(chars.len());
        if start < cursor {
            continue;
        }
        if start > cursor {
            spans.push(Span::raw(chars[cursor..start].iter().collect::<String>()));
        }

        let width = token.text.chars().count();
        let end = (start + width).min(chars.len());
        let is_callee = token.is(TokenKind::Identifier)
            && tokens.get(i + 1).is_some_and(|next| next.is(TokenKind::LParen));
        let style = if is_callee {
            Style::default().fg(DEFAULT_THEME.function)
        } else {
            token_style(token.kind)
        };
        spans.push(Span::styled(chars[start..end].iter().collect::<String>(), style));
        cursor = end;
    }

    if cursor < chars.len() {
        spans.push(Span::raw(chars[cursor..].iter().collect::<String>()));
    }

    Line::from(spans)
}

/// Scroll state for the source pane
#[derive(Debug, Default)]
pub struct SourceScrollState {
    pub offset: usize,
    pub target_line_row: Option<usize>,
}

/// What the source pane draws
pub struct SourceRenderData<'a> {
    pub source: &'a str,
    pub tokens: &'a [Token],
    /// 1-based inclusive line range of the current statement
    pub current_lines: Option<(usize, usize)>,
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    data: &SourceRenderData,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let block = pane_block(" Source ", is_focused);

    let lines: Vec<&str> = data.source.lines().collect();
    let total_lines = lines.len();

    let mut tokens_by_line: FxHashMap<usize, Vec<&Token>> = FxHashMap::default();
    for token in data.tokens {
        tokens_by_line
            .entry(token.location.line)
            .or_default()
            .push(token);
    }

    // Calculate visible range
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders (2), min 1

    // Initialize target_line_row to a third of the way down if not set
    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 3)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    // Keep the first line of the current statement at the target visual row
    if let Some((first, _)) = data.current_lines {
        if first > 0 && first <= total_lines {
            scroll_state.offset = (first - 1).saturating_sub(target_row);
        }
    }
    if total_lines > visible_height {
        scroll_state.offset = scroll_state.offset.min(total_lines - visible_height);
    } else {
        scroll_state.offset = 0;
    }

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_current = data
                .current_lines
                .is_some_and(|(first, last)| (first..=last).contains(&line_num));

            let num_style = if is_current {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment) // Line numbers
            };

            let line_tokens = tokens_by_line
                .get(&line_num)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let mut content_line = highlight_line(line, line_tokens);

            if is_current {
                let current_bg = Style::default().bg(DEFAULT_THEME.current_line_bg);
                for span in &mut content_line.spans {
                    span.style = span.style.patch(current_bg);
                }
            }

            let mut final_spans = vec![Span::styled(format!("{:4} ", line_num), num_style)];
            final_spans.extend(content_line.spans);

            Line::from(final_spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}
