//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, configuration, helper methods, and the program
//! driver.
//!
//! # Parser Architecture
//!
//! The Parser is a fail-fast recursive descent parser:
//! - This module: Parser struct, token-stream helpers, and coordination
//! - `statements`: one top-level construct per call, dispatched on lookahead
//! - `expressions`: Expression → Term → Factor precedence chain
//!
//! The first error anywhere aborts the whole parse; nothing is recovered.
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared token stream.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token, TokenKind};
use crate::parser::trace::{Rule, Trace, TraceEvent, TraceMode};
use thiserror::Error;

fn describe_found(found: &Option<Token>) -> String {
    match found {
        Some(token) => token.to_string(),
        None => "end of input".to_string(),
    }
}

/// Deepest rule nesting accepted before the parse fails.
///
/// Each parenthesis level costs three rules and each nested body two, so this
/// allows roughly 85 nested parentheses or 125 nested bodies.
pub const MAX_DEPTH: usize = 256;

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Parse error at line {}, column {}: {}, found {}",
    .location.line,
    .location.column,
    .expected,
    describe_found(.found)
)]
pub struct ParseError {
    /// What the failing rule was looking for, e.g. `expected expression`
    pub expected: String,
    /// The unexpected token, `None` at end of input
    pub found: Option<Token>,
    pub location: SourceLocation,
}

/// Any failure from source text to normalized output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Error {
    pub fn location(&self) -> SourceLocation {
        match self {
            Error::Lex(e) => e.location,
            Error::Parse(e) => e.location,
        }
    }

    /// `"LexError"` or `"ParseError"`
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Lex(_) => "LexError",
            Error::Parse(_) => "ParseError",
        }
    }
}

/// How strictly comma-separated lists are checked.
///
/// [`ParserConfig::separators`] applies to for-loop number lists, function
/// parameters and call arguments inside expressions. Call statements always
/// use [`SeparatorPolicy::Trailing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeparatorPolicy {
    /// Commas between elements may be omitted: `[1 2, 3]`.
    #[default]
    Lenient,
    /// Exactly one comma between elements, none trailing.
    Strict,
    /// A comma between elements, plus at most one before the close: `f(1, 2,)`.
    Trailing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParserConfig {
    pub separators: SeparatorPolicy,
    pub trace: TraceMode,
}

/// Recursive descent parser for the pseudocode language
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    pub(crate) config: ParserConfig,
    trace: Box<dyn Trace + Send>,
    depth: usize,
    end_location: SourceLocation,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_config(tokens, ParserConfig::default())
    }

    pub fn with_config(tokens: Vec<Token>, config: ParserConfig) -> Self {
        let end_location = tokens.last().map(end_of).unwrap_or_default();
        Self {
            tokens,
            position: 0,
            config,
            trace: config.trace.sink(),
            depth: 0,
            end_location,
        }
    }

    /// Tokenize `source` and build a parser over the result.
    pub fn from_source(source: &str, config: ParserConfig) -> Result<Self, LexError> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(Self::with_config(tokens, config))
    }

    /// Parse the entire program (statements until the stream is drained)
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        self.traced(Rule::Program, |p| {
            let mut program = Program::new();

            while !p.is_at_end() {
                let stmt = p.parse_statement()?;
                program.nodes.push(stmt);
            }

            log::debug!("parsed {} statements", program.nodes.len());
            Ok(program)
        })
    }

    /// Trace events collected so far (empty unless tracing is `Collect`).
    pub fn take_trace(&mut self) -> Vec<TraceEvent> {
        self.trace.take_events()
    }

    /// Tokens not yet consumed.
    pub fn remaining(&self) -> &[Token] {
        &self.tokens[self.position..]
    }

    // ===== Helper methods =====

    /// Report entry into `rule`, then run it one level deeper.
    ///
    /// Fails instead of recursing past [`MAX_DEPTH`].
    pub(crate) fn traced<T>(
        &mut self,
        rule: Rule,
        body: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }

        let event = TraceEvent {
            rule,
            depth: self.depth,
            lookahead: self.peek().map(|t| t.text.clone()),
            location: self.current_location(),
        };
        self.trace.record(event);

        self.depth += 1;
        let result = body(self);
        self.depth -= 1;
        result
    }

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    pub(crate) fn check_ahead(&self, n: usize, kind: TokenKind) -> bool {
        self.peek_ahead(n).is_some_and(|t| t.is(kind))
    }

    /// Consume the lookahead. Callers check it exists first.
    pub(crate) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    pub(crate) fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().map(|t| t.location).unwrap_or(self.end_location)
    }

    /// Build an error against the current lookahead.
    pub(crate) fn error(&self, expected: impl Into<String>) -> ParseError {
        ParseError {
            expected: expected.into(),
            found: self.peek().cloned(),
            location: self.current_location(),
        }
    }

    pub(crate) fn expect_token(
        &mut self,
        kind: TokenKind,
        expected: &str,
    ) -> Result<Token, ParseError> {
        if self.check(kind) {
            self.advance().ok_or_else(|| self.error(expected))
        } else {
            Err(self.error(expected))
        }
    }

    pub(crate) fn expect_identifier(&mut self, expected: &str) -> Result<String, ParseError> {
        self.expect_token(TokenKind::Identifier, expected)
            .map(|token| token.text)
    }
}

/// Location just past the end of `token`. Tokens never span lines.
fn end_of(token: &Token) -> SourceLocation {
    let mut end = token.location;
    end.column += token.text.chars().count();
    end.offset += token.text.len();
    end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<Program, ParseError> {
        Parser::from_source(source, ParserConfig::default())
            .unwrap()
            .parse_program()
    }

    #[test]
    fn test_parse_two_statements() {
        let program = parse("x <- 1\nprint(x)").unwrap();

        assert_eq!(program.nodes.len(), 2);
        assert!(matches!(program.nodes[0], Stmt::Assign { ref name, .. } if name == "x"));
        assert!(matches!(program.nodes[1], Stmt::Print { .. }));
    }

    #[test]
    fn test_empty_program() {
        let program = parse("   \n\t").unwrap();
        assert!(program.nodes.is_empty());
    }

    #[test]
    fn test_error_at_end_of_input() {
        let err = parse("x <- 2 +").unwrap_err();

        assert_eq!(err.expected, "expected expression");
        assert!(err.found.is_none());
        assert_eq!(err.location, SourceLocation::new(1, 9, 8));
        assert_eq!(
            err.to_string(),
            "Parse error at line 1, column 9: expected expression, found end of input"
        );
    }

    #[test]
    fn test_error_names_unexpected_token() {
        let err = parse("then").unwrap_err();

        assert_eq!(err.found.as_ref().map(|t| t.kind), Some(TokenKind::Then));
        assert!(err.to_string().contains("found 'then'"));
    }

    #[test]
    fn test_remaining_shrinks_from_front() {
        let tokens = crate::parser::lexer::tokenize("a <- 1 b <- 2").unwrap();
        let mut parser = Parser::new(tokens);

        parser.parse_statement().unwrap();
        let rest: Vec<&str> = parser.remaining().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(rest, vec!["b", "<-", "2"]);
    }

    #[test]
    fn test_collected_trace() {
        let config = ParserConfig {
            trace: TraceMode::Collect,
            ..ParserConfig::default()
        };
        let mut parser = Parser::from_source("print(1)", config).unwrap();
        parser.parse_program().unwrap();
        let trace = parser.take_trace();

        let rules: Vec<Rule> = trace.iter().map(|e| e.rule).collect();
        assert_eq!(
            rules,
            vec![
                Rule::Program,
                Rule::Statement,
                Rule::Print,
                Rule::Expression,
                Rule::Term,
                Rule::Factor,
            ]
        );
        assert_eq!(trace[5].depth, 5);
        assert_eq!(trace[5].lookahead.as_deref(), Some("1"));
    }

    #[test]
    fn test_deep_parentheses_fail_cleanly() {
        let depth = 3000;
        let source = format!("x <- {}1{}", "(".repeat(depth), ")".repeat(depth));

        let err = parse(&source).unwrap_err();
        assert_eq!(err.expected, "nesting too deep");
        assert_eq!(err.found.map(|t| t.kind), Some(TokenKind::LParen));
    }

    #[test]
    fn test_deep_bodies_fail_cleanly() {
        let source = format!("{}x <- 1", "if (a < b) then do ".repeat(2000));

        let err = parse(&source).unwrap_err();
        assert_eq!(err.expected, "nesting too deep");
    }

    #[test]
    fn test_moderate_nesting_parses() {
        let source = format!("x <- {}1{}", "(".repeat(40), ")".repeat(40));
        assert!(parse(&source).is_ok());

        let source = format!("{}x <- 1", "while (i < 3) do ".repeat(60));
        assert!(parse(&source).is_ok());
    }

    #[test]
    fn test_error_kind_and_location() {
        let lex: Error = crate::parser::lexer::tokenize("@").unwrap_err().into();
        assert_eq!(lex.kind(), "LexError");
        assert_eq!(lex.location().column, 1);

        let parse_err: Error = parse("else").unwrap_err().into();
        assert_eq!(parse_err.kind(), "ParseError");
    }
}
