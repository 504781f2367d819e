//! TUI pane rendering modules
//!
//! This module provides the rendering logic for all visual panes in the TUI,
//! organized by responsibility for maintainability.
//!
//! # Pane Modules
//!
//! - [`source`]: Source code display with token highlighting and current statement indicator
//! - [`output`]: Normalized output with the current statement's rendering marked
//! - [`tokens`]: Tokens of the current statement plus a whole-program kind histogram
//! - [`trace`]: Grammar rule trace collected during the parse
//! - [`status`]: Status bar with keybindings and stepping state

pub mod output;
pub mod source;
pub mod status;
pub mod tokens;
pub mod trace;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders},
};

// Re-export render functions for convenience
pub use output::render_output_pane;
pub use source::{render_source_pane, SourceRenderData, SourceScrollState};
pub use status::{render_status_bar, StatusRenderData};
pub use tokens::render_tokens_pane;
pub use trace::render_trace_pane;

/// Bordered block whose border reflects focus.
pub(crate) fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Clamp `scroll_offset` so the last page stays full; returns the visible height.
pub(crate) fn clamp_scroll(total_items: usize, area: Rect, scroll_offset: &mut usize) -> usize {
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1

    if total_items > visible_height {
        let max_scroll = total_items - visible_height;
        *scroll_offset = (*scroll_offset).min(max_scroll);
    } else {
        *scroll_offset = 0;
    }

    visible_height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_scroll() {
        let area = Rect::new(0, 0, 40, 12); // 10 visible rows

        let mut offset = usize::MAX;
        assert_eq!(clamp_scroll(25, area, &mut offset), 10);
        assert_eq!(offset, 15);

        let mut offset = 4;
        clamp_scroll(8, area, &mut offset);
        assert_eq!(offset, 0);
    }
}
