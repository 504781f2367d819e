//! Parse tracing
//!
//! Grammar rules never print. Each rule reports its entry to a [`Trace`]
//! sink instead; the parser owns whichever sink [`TraceMode`] selects.

use super::ast::SourceLocation;
use std::fmt;

/// Grammar rules that report to the trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Program,
    Statement,
    Assignment,
    CallStatement,
    FunctionDef,
    If,
    While,
    DoWhile,
    For,
    Print,
    Return,
    Condition,
    Expression,
    Term,
    Factor,
    Call,
}

impl Rule {
    pub fn name(self) -> &'static str {
        match self {
            Rule::Program => "program",
            Rule::Statement => "statement",
            Rule::Assignment => "assignment",
            Rule::CallStatement => "call statement",
            Rule::FunctionDef => "function definition",
            Rule::If => "if",
            Rule::While => "while",
            Rule::DoWhile => "do-while",
            Rule::For => "for",
            Rule::Print => "print",
            Rule::Return => "return",
            Rule::Condition => "condition",
            Rule::Expression => "expression",
            Rule::Term => "term",
            Rule::Factor => "factor",
            Rule::Call => "call",
        }
    }
}

/// One rule entry: which rule, how deep, and the lookahead it saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    pub rule: Rule,
    pub depth: usize,
    /// Lookahead text, `None` at end of input
    pub lookahead: Option<String>,
    pub location: SourceLocation,
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:indent$}{} @{}:{}",
            "",
            self.rule.name(),
            self.location.line,
            self.location.column,
            indent = self.depth * 2
        )?;
        match &self.lookahead {
            Some(text) => write!(f, " [{}]", text),
            None => write!(f, " [end of input]"),
        }
    }
}

/// Diagnostic sink fed by the grammar rules.
pub trait Trace {
    fn record(&mut self, event: TraceEvent);

    /// Events gathered so far, for sinks that keep them.
    fn take_events(&mut self) -> Vec<TraceEvent> {
        Vec::new()
    }
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct NoTrace;

impl Trace for NoTrace {
    fn record(&mut self, _event: TraceEvent) {}
}

/// Accumulates events to be returned alongside the parse result.
#[derive(Debug, Default)]
pub struct TraceLog {
    pub events: Vec<TraceEvent>,
}

impl Trace for TraceLog {
    fn record(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    fn take_events(&mut self) -> Vec<TraceEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Forwards events to the `log` facade at trace level.
#[derive(Debug, Default)]
pub struct LogTrace;

impl Trace for LogTrace {
    fn record(&mut self, event: TraceEvent) {
        log::trace!("{}", event);
    }
}

/// Which sink a parser is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceMode {
    #[default]
    Off,
    Collect,
    Log,
}

impl TraceMode {
    pub fn sink(self) -> Box<dyn Trace + Send> {
        match self {
            TraceMode::Off => Box::new(NoTrace),
            TraceMode::Collect => Box::new(TraceLog::default()),
            TraceMode::Log => Box::new(LogTrace),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(rule: Rule, depth: usize, lookahead: Option<&str>) -> TraceEvent {
        TraceEvent {
            rule,
            depth,
            lookahead: lookahead.map(str::to_string),
            location: SourceLocation::new(3, 7, 20),
        }
    }

    #[test]
    fn test_event_display() {
        assert_eq!(
            event(Rule::Factor, 2, Some("x")).to_string(),
            "    factor @3:7 [x]"
        );
        assert_eq!(
            event(Rule::Statement, 0, None).to_string(),
            "statement @3:7 [end of input]"
        );
    }

    #[test]
    fn test_trace_log_take_empties() {
        let mut log = TraceLog::default();
        log.record(event(Rule::Program, 0, Some("x")));

        assert_eq!(log.take_events().len(), 1);
        assert!(log.take_events().is_empty());
    }

    #[test]
    fn test_off_keeps_nothing() {
        let mut sink = TraceMode::Off.sink();
        sink.record(event(Rule::Term, 1, Some("2")));

        assert!(sink.take_events().is_empty());
    }
}
