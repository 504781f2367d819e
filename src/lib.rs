//! # Introduction
//!
//! pseudonorm parses a small imperative pseudocode language and re-prints it in
//! a canonical form. Nothing is evaluated: the output is the syntactically
//! validated program, normalized.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → AST → Renderer → normalized text
//! ```
//!
//! 1. [`parser::lexer`]: ordered-catalog tokenizer.
//! 2. [`parser::parse`]: fail-fast recursive descent parser building a
//!    [`parser::ast::Program`].
//! 3. [`parser::render`]: canonical text rendering.
//! 4. [`ui`]: ratatui-based statement stepper; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! let out = pseudonorm::normalize("x <- 2 + 3").unwrap();
//! assert_eq!(out, "x = 2 + 3\n");
//! ```

pub mod parser;
pub mod ui;

pub use parser::ast::Program;
pub use parser::lexer::{LexError, Token, TokenKind};
pub use parser::parse::{Error, ParseError, Parser, ParserConfig, SeparatorPolicy};
pub use parser::trace::{TraceEvent, TraceMode};

use parser::render::render_program;

/// Split `source` into tokens.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    parser::lexer::tokenize(source)
}

/// Parse a token stream to completion and render it.
pub fn parse_program(tokens: Vec<Token>) -> Result<String, ParseError> {
    let program = Parser::new(tokens).parse_program()?;
    Ok(render_program(&program))
}

/// Normalize `source` with the default configuration.
pub fn normalize(source: &str) -> Result<String, Error> {
    let tokens = tokenize(source)?;
    Ok(parse_program(tokens)?)
}

/// Everything produced by a successful parse.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub output: String,
    pub program: Program,
    pub tokens: Vec<Token>,
    pub trace: Vec<TraceEvent>,
}

/// Normalize `source`, keeping the tokens, tree and trace alongside the text.
pub fn normalize_with(source: &str, config: &ParserConfig) -> Result<Normalized, Error> {
    let tokens = tokenize(source)?;
    let mut p = Parser::with_config(tokens.clone(), *config);
    let program = p.parse_program()?;

    Ok(Normalized {
        output: render_program(&program),
        trace: p.take_trace(),
        program,
        tokens,
    })
}
