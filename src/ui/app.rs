//! Main TUI application state and logic

use crate::parser::ast::Program;
use crate::parser::lexer::{token_histogram, Token, TokenKind};
use crate::parser::render::render_statement;
use crate::Normalized;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use rustc_hash::FxHashMap;
use std::io;
use std::ops::Range;
use std::time::Duration;

use super::panes::{self, SourceRenderData, SourceScrollState, StatusRenderData};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Output,
    Tokens,
    Trace,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: source -> output -> tokens -> trace)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Tokens,
            FocusedPane::Tokens => FocusedPane::Trace,
            FocusedPane::Trace => FocusedPane::Source,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Trace,
            FocusedPane::Output => FocusedPane::Source,
            FocusedPane::Tokens => FocusedPane::Output,
            FocusedPane::Trace => FocusedPane::Tokens,
        }
    }
}

/// Where one top-level statement lives in the source, tokens and output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementView {
    /// Range into the token stream
    pub tokens: Range<usize>,
    /// 1-based inclusive source line range
    pub first_line: usize,
    pub last_line: usize,
    /// 0-based range of output lines
    pub output: Range<usize>,
}

/// Map every top-level statement to its tokens, source lines and output lines.
///
/// Statement locations are the locations of their first tokens, so a single
/// forward cursor over the token stream finds each start.
pub fn build_statement_views(program: &Program, tokens: &[Token]) -> Vec<StatementView> {
    let mut starts = Vec::with_capacity(program.nodes.len());
    let mut cursor = 0;
    for stmt in &program.nodes {
        while cursor < tokens.len() && tokens[cursor].location < *stmt.location() {
            cursor += 1;
        }
        starts.push(cursor.min(tokens.len()));
    }

    let mut views = Vec::with_capacity(starts.len());
    let mut output_line = 0;

    for (i, stmt) in program.nodes.iter().enumerate() {
        let start = starts[i];
        let end = starts.get(i + 1).copied().unwrap_or(tokens.len()).max(start);

        let first_line = tokens
            .get(start)
            .map_or(stmt.location().line, |t| t.location.line);
        let last_line = tokens[start..end]
            .last()
            .map_or(first_line, |t| t.location.line);

        let output_len = render_statement(stmt).lines().count().max(1);

        views.push(StatementView {
            tokens: start..end,
            first_line,
            last_line,
            output: output_line..output_line + output_len,
        });
        output_line += output_len;
    }

    views
}

/// The main application state
pub struct App {
    /// The source text being viewed
    pub source_code: String,

    /// Output, tree, tokens and trace of the parse
    pub normalized: Normalized,

    /// Token kind counts over the whole program
    pub histogram: FxHashMap<TokenKind, usize>,

    /// One entry per top-level statement
    pub views: Vec<StatementView>,

    /// Index of the current statement
    pub current: usize,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub source_scroll: SourceScrollState,
    pub output_scroll: usize,
    pub tokens_scroll: usize,
    pub trace_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    /// Create a new app over a successful parse of `source_code`
    pub fn new(normalized: Normalized, source_code: String) -> Self {
        let views = build_statement_views(&normalized.program, &normalized.tokens);
        let histogram = token_histogram(&normalized.tokens);
        let status_message = format!(
            "Parsed {} statement(s), {} token(s)",
            views.len(),
            normalized.tokens.len()
        );

        App {
            source_code,
            normalized,
            histogram,
            views,
            current: 0,
            focused_pane: FocusedPane::Source,
            source_scroll: SourceScrollState::default(),
            output_scroll: 0,
            tokens_scroll: 0,
            trace_scroll: 0,
            should_quit: false,
            status_message,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn current_view(&self) -> Option<&StatementView> {
        self.views.get(self.current)
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Create layout: 4 panes in 2 columns, plus status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let pane_area = main_chunks[0];
        let status_area = main_chunks[1];

        // Split into 2 columns
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(pane_area);

        // Left column: Source (top) | Output (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(columns[0]);

        // Right column: Tokens (top) | Trace (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[1]);

        let view = self.current_view().cloned();

        let source_data = SourceRenderData {
            source: &self.source_code,
            tokens: &self.normalized.tokens,
            current_lines: view.as_ref().map(|v| (v.first_line, v.last_line)),
        };
        panes::render_source_pane(
            frame,
            left_rows[0],
            &source_data,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        panes::render_output_pane(
            frame,
            left_rows[1],
            &self.normalized.output,
            view.as_ref().map(|v| v.output.clone()),
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        let statement_tokens = view
            .as_ref()
            .and_then(|v| self.normalized.tokens.get(v.tokens.clone()))
            .unwrap_or(&[]);
        panes::render_tokens_pane(
            frame,
            right_rows[0],
            statement_tokens,
            &self.histogram,
            self.focused_pane == FocusedPane::Tokens,
            &mut self.tokens_scroll,
        );

        panes::render_trace_pane(
            frame,
            right_rows[1],
            &self.normalized.trace,
            self.focused_pane == FocusedPane::Trace,
            &mut self.trace_scroll,
        );

        let status_data = StatusRenderData {
            message: &self.status_message,
            current: self.current,
            total: self.views.len(),
        };
        panes::render_status_bar(frame, status_area, &status_data);
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N statements directly
            KeyCode::Char(c @ '1'..='9') => {
                let n = c.to_digit(10).unwrap_or(1) as usize;
                let before = self.current;
                self.jump_to(self.current + n);
                self.status_message =
                    format!("Stepped forward {} statement(s)", self.current - before);
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => self.step_backward(),
            KeyCode::Right => self.step_forward(),
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => {
                    // Scrolling up makes the current statement move down visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::Output => self.output_scroll = self.output_scroll.saturating_sub(1),
                FocusedPane::Tokens => self.tokens_scroll = self.tokens_scroll.saturating_sub(1),
                FocusedPane::Trace => self.trace_scroll = self.trace_scroll.saturating_sub(1),
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => {
                    // Scrolling down makes the current statement move up visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::Output => self.output_scroll = self.output_scroll.saturating_add(1),
                FocusedPane::Tokens => self.tokens_scroll = self.tokens_scroll.saturating_add(1),
                FocusedPane::Trace => self.trace_scroll = self.trace_scroll.saturating_add(1),
            },
            KeyCode::Enter => {
                self.jump_to(usize::MAX);
                self.status_message = "Jumped to end".to_string();
            }
            KeyCode::Backspace => {
                self.jump_to(0);
                self.status_message = "Jumped to start".to_string();
            }
            _ => {}
        }
    }

    /// Move to statement `index`, clamped to the program.
    fn jump_to(&mut self, index: usize) {
        self.current = index.min(self.views.len().saturating_sub(1));
        self.tokens_scroll = 0;
        self.follow_output();
    }

    /// Scroll the output pane so the current statement's first line is visible.
    fn follow_output(&mut self) {
        if let Some(view) = self.current_view() {
            self.output_scroll = view.output.start;
        }
    }

    /// Step to the next statement
    fn step_forward(&mut self) {
        if self.current + 1 < self.views.len() {
            self.jump_to(self.current + 1);
            self.status_message = "Stepped forward".to_string();
        } else {
            self.status_message = "Cannot step forward: at last statement".to_string();
        }
    }

    /// Step to the previous statement
    fn step_backward(&mut self) {
        if self.current > 0 {
            self.jump_to(self.current - 1);
            self.status_message = "Stepped backward".to_string();
        } else {
            self.status_message = "Cannot step backward: at first statement".to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize_with;
    use crate::parser::parse::ParserConfig;

    fn app(source: &str) -> App {
        let normalized = normalize_with(source, &ParserConfig::default()).unwrap();
        App::new(normalized, source.to_string())
    }

    #[test]
    fn test_views_cover_every_token() {
        let source = "x <- 1\nif (x < 2) then do\n  print(x)\nadd(1, 2)";
        let app = app(source);

        assert_eq!(app.views.len(), 3);
        assert_eq!(app.views[0].tokens, 0..3);
        assert_eq!(app.views[1].tokens.start, 3);
        assert_eq!(app.views[2].tokens.end, app.normalized.tokens.len());

        assert_eq!((app.views[1].first_line, app.views[1].last_line), (2, 3));
        assert_eq!((app.views[2].first_line, app.views[2].last_line), (4, 4));
    }

    #[test]
    fn test_views_track_output_lines() {
        let app = app("x <- 1\nwhile (x < 3) do x <- x + 1\nprint(x)");

        assert_eq!(app.views[0].output, 0..1);
        assert_eq!(app.views[1].output, 1..3);
        assert_eq!(app.views[2].output, 3..4);
        assert_eq!(app.normalized.output.lines().count(), 4);
    }

    #[test]
    fn test_stepping_is_clamped() {
        let mut app = app("a <- 1\nb <- 2");

        app.step_backward();
        assert_eq!(app.current, 0);

        app.step_forward();
        app.step_forward();
        assert_eq!(app.current, 1);

        app.jump_to(0);
        app.handle_key_event(KeyEvent::from(KeyCode::Char('9')));
        assert_eq!(app.current, 1);
    }

    #[test]
    fn test_focus_cycles() {
        let mut pane = FocusedPane::Source;
        for _ in 0..4 {
            pane = pane.next();
        }
        assert_eq!(pane, FocusedPane::Source);
        assert_eq!(FocusedPane::Source.prev(), FocusedPane::Trace);
    }

    #[test]
    fn test_empty_program() {
        let mut app = app("");
        assert!(app.views.is_empty());
        app.step_forward();
        app.jump_to(usize::MAX);
        assert_eq!(app.current, 0);
    }
}
