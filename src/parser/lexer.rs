//! Lexer (tokenizer) for pseudocode source
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Lexing is driven by the ordered [`CATALOG`]: at every position the rules are
//! tried in declaration order and the first one matching a non-empty prefix
//! wins. Whitespace between tokens is skipped and never produces a token.

use super::ast::SourceLocation;
use rustc_hash::FxHashMap;
use std::fmt;
use thiserror::Error;

/// Every kind of lexical unit the catalog can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    Number,
    StringLiteral,

    // Identifiers
    Identifier,

    // Assignment marker
    Assign, // <-

    // Keywords
    If,
    Else,
    While,
    For,
    Do,
    Then,
    In,
    Function,
    Return,
    Print,

    // Arithmetic
    Plus,  // +
    Minus, // -
    Star,  // *
    Slash, // /

    // Comparison
    EqEq,  // ==
    NotEq, // !=
    Lt,    // <
    Le,    // <=
    Gt,    // >
    Ge,    // >=

    // Punctuation
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    Colon,    // :
    Comma,    // ,
}

impl TokenKind {
    /// Stable uppercase identifier for diagnostics and token dumps.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Number => "NUMBER",
            TokenKind::StringLiteral => "STRING",
            TokenKind::Identifier => "VARIABLE",
            TokenKind::Assign => "ASSIGNMENT",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::While => "WHILE",
            TokenKind::For => "FOR",
            TokenKind::Do => "DO",
            TokenKind::Then => "THEN",
            TokenKind::In => "IN",
            TokenKind::Function => "FUNCTION",
            TokenKind::Return => "RETURN",
            TokenKind::Print => "PRINT",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "MULTIPLY",
            TokenKind::Slash => "DIVIDE",
            TokenKind::EqEq => "EQUALS",
            TokenKind::NotEq => "NOT_EQUALS",
            TokenKind::Lt => "LESS_THAN",
            TokenKind::Le => "LESS_EQUALS",
            TokenKind::Gt => "GREATER_THAN",
            TokenKind::Ge => "GREATER_EQUALS",
            TokenKind::LParen => "OPEN_PAREN",
            TokenKind::RParen => "CLOSE_PAREN",
            TokenKind::LBracket => "OPEN_BRACKET",
            TokenKind::RBracket => "CLOSE_BRACKET",
            TokenKind::Colon => "COLON",
            TokenKind::Comma => "COMMA",
        }
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::If
                | TokenKind::Else
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Do
                | TokenKind::Then
                | TokenKind::In
                | TokenKind::Function
                | TokenKind::Return
                | TokenKind::Print
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number => write!(f, "number"),
            TokenKind::StringLiteral => write!(f, "string literal"),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::Assign => write!(f, "'<-'"),
            TokenKind::If => write!(f, "'if'"),
            TokenKind::Else => write!(f, "'else'"),
            TokenKind::While => write!(f, "'while'"),
            TokenKind::For => write!(f, "'for'"),
            TokenKind::Do => write!(f, "'do'"),
            TokenKind::Then => write!(f, "'then'"),
            TokenKind::In => write!(f, "'in'"),
            TokenKind::Function => write!(f, "'function'"),
            TokenKind::Return => write!(f, "'return'"),
            TokenKind::Print => write!(f, "'print'"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::EqEq => write!(f, "'=='"),
            TokenKind::NotEq => write!(f, "'!='"),
            TokenKind::Lt => write!(f, "'<'"),
            TokenKind::Le => write!(f, "'<='"),
            TokenKind::Gt => write!(f, "'>'"),
            TokenKind::Ge => write!(f, "'>='"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::Comma => write!(f, "','"),
        }
    }
}

/// A single lexical unit: its kind, the exact text it matched, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            text: text.into(),
            location,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Number => write!(f, "number {}", self.text),
            TokenKind::StringLiteral => write!(f, "string literal {}", self.text),
            TokenKind::Identifier => write!(f, "identifier '{}'", self.text),
            kind => write!(f, "{}", kind),
        }
    }
}

/// The shape a catalog rule matches against the remaining input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Exact text, e.g. `<=`.
    Exact(&'static str),
    /// Exact text that must not run on into an identifier character.
    Keyword(&'static str),
    /// `-?[0-9]+(\.[0-9]+)?`
    Number,
    /// `"` up to the next `"` on the same line, no escapes.
    StringLiteral,
    /// `[A-Za-z_][A-Za-z0-9_]*`
    Identifier,
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn digit_run(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

impl Pattern {
    /// Byte length of the prefix of `input` matched by this pattern, if any.
    /// Never returns `Some(0)`.
    pub fn match_len(self, input: &str) -> Option<usize> {
        let bytes = input.as_bytes();
        match self {
            Pattern::Exact(text) => input.starts_with(text).then_some(text.len()),
            Pattern::Keyword(text) => {
                if !input.starts_with(text) {
                    return None;
                }
                match bytes.get(text.len()) {
                    Some(&b) if is_ident_continue(b) => None,
                    _ => Some(text.len()),
                }
            }
            Pattern::Number => {
                let sign = usize::from(bytes.first() == Some(&b'-'));
                let int_len = digit_run(&bytes[sign..]);
                if int_len == 0 {
                    return None;
                }
                let mut len = sign + int_len;
                if bytes.get(len) == Some(&b'.') {
                    let frac_len = digit_run(&bytes[len + 1..]);
                    if frac_len > 0 {
                        len += 1 + frac_len;
                    }
                }
                Some(len)
            }
            Pattern::StringLiteral => {
                if bytes.first() != Some(&b'"') {
                    return None;
                }
                let close = input[1..].find(|c| c == '"' || c == '\n')?;
                (bytes[1 + close] == b'"').then_some(close + 2)
            }
            Pattern::Identifier => {
                if !bytes.first().copied().is_some_and(is_ident_start) {
                    return None;
                }
                Some(1 + bytes[1..].iter().take_while(|&&b| is_ident_continue(b)).count())
            }
        }
    }
}

/// Ordered lexical rules. Earlier rules win, so longer or more specific
/// patterns sit ahead of the shorter ones they overlap with.
pub const CATALOG: &[(Pattern, TokenKind)] = &[
    (Pattern::Number, TokenKind::Number),
    (Pattern::Exact("<-"), TokenKind::Assign),
    (Pattern::Keyword("if"), TokenKind::If),
    (Pattern::Keyword("else"), TokenKind::Else),
    (Pattern::Keyword("while"), TokenKind::While),
    (Pattern::Keyword("for"), TokenKind::For),
    (Pattern::Keyword("do"), TokenKind::Do),
    (Pattern::Keyword("print"), TokenKind::Print),
    (Pattern::Keyword("then"), TokenKind::Then),
    (Pattern::Keyword("in"), TokenKind::In),
    (Pattern::Keyword("function"), TokenKind::Function),
    (Pattern::Keyword("return"), TokenKind::Return),
    (Pattern::Exact("=="), TokenKind::EqEq),
    (Pattern::Exact("!="), TokenKind::NotEq),
    (Pattern::Exact("<="), TokenKind::Le),
    (Pattern::Exact(">="), TokenKind::Ge),
    (Pattern::Exact("<"), TokenKind::Lt),
    (Pattern::Exact(">"), TokenKind::Gt),
    (Pattern::Exact("+"), TokenKind::Plus),
    (Pattern::Exact("-"), TokenKind::Minus),
    (Pattern::Exact("*"), TokenKind::Star),
    (Pattern::Exact("/"), TokenKind::Slash),
    (Pattern::Exact("("), TokenKind::LParen),
    (Pattern::Exact(")"), TokenKind::RParen),
    (Pattern::Exact("["), TokenKind::LBracket),
    (Pattern::Exact("]"), TokenKind::RBracket),
    (Pattern::Exact(":"), TokenKind::Colon),
    (Pattern::Exact(","), TokenKind::Comma),
    (Pattern::StringLiteral, TokenKind::StringLiteral),
    (Pattern::Identifier, TokenKind::Identifier),
];

/// Raised when no catalog rule matches at the current position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Lexer error at line {}, column {}: invalid character '{}'",
    .location.line,
    .location.column,
    .character
)]
pub struct LexError {
    pub character: char,
    /// Byte index of `character` in the original source
    pub offset: usize,
    pub location: SourceLocation,
}

/// Lexer for pseudocode source
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source string.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();

            if self.is_at_end() {
                break;
            }

            tokens.push(self.next_token()?);
        }

        log::debug!("lexed {} tokens", tokens.len());
        Ok(tokens)
    }

    /// Match the first catalog rule against the remaining input
    fn next_token(&mut self) -> Result<Token, LexError> {
        let rest = &self.input[self.position..];
        let loc = self.current_location();

        let matched = CATALOG
            .iter()
            .find_map(|&(pattern, kind)| pattern.match_len(rest).map(|len| (kind, len)));

        match matched {
            Some((kind, len)) => {
                let text = &rest[..len];
                self.advance(len);
                Ok(Token::new(kind, text, loc))
            }
            None => Err(LexError {
                // is_at_end() was checked by the caller, so rest is non-empty
                character: rest.chars().next().unwrap_or('\0'),
                offset: self.position,
                location: loc,
            }),
        }
    }

    /// Skip whitespace
    fn skip_whitespace(&mut self) {
        let skipped = self.input[self.position..]
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(self.input.len() - self.position);
        self.advance(skipped);
    }

    /// Advance `len` bytes, tracking line and column
    fn advance(&mut self, len: usize) {
        for ch in self.input[self.position..self.position + len].chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.position += len;
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column, self.position)
    }
}

/// Tokenize `source` in one call.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

/// Count tokens per kind.
pub fn token_histogram(tokens: &[Token]) -> FxHashMap<TokenKind, usize> {
    let mut counts = FxHashMap::default();
    for token in tokens {
        *counts.entry(token.kind).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_simple_assignment() {
        let tokens = tokenize("x <- 2 + 3").unwrap();

        assert_eq!(tokens.len(), 5);
        assert!(matches!(tokens[0].kind, TokenKind::Identifier));
        assert_eq!(tokens[0].text, "x");
        assert!(matches!(tokens[1].kind, TokenKind::Assign));
        assert!(matches!(tokens[2].kind, TokenKind::Number));
        assert!(matches!(tokens[3].kind, TokenKind::Plus));
        assert_eq!(tokens[4].text, "3");
    }

    #[test]
    fn test_two_char_operators_win() {
        assert_eq!(
            kinds("<= >= == != < > <-"),
            vec![
                TokenKind::Le,
                TokenKind::Ge,
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::Assign,
            ]
        );
    }

    #[test]
    fn test_keywords_need_word_boundary() {
        assert_eq!(
            kinds("if input done do"),
            vec![
                TokenKind::If,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Do,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        let tokens = tokenize("3.5 -2 7").unwrap();

        assert_eq!(tokens[0].text, "3.5");
        assert_eq!(tokens[1].text, "-2");
        assert!(matches!(tokens[1].kind, TokenKind::Number));
        assert_eq!(tokens[2].text, "7");

        // a trailing dot is not a fraction, and '.' alone matches nothing
        let err = tokenize("7.").unwrap_err();
        assert_eq!(err.character, '.');
        assert_eq!(err.offset, 1);
    }

    #[test]
    fn test_spaced_minus_is_operator() {
        assert_eq!(
            kinds("a - 1"),
            vec![TokenKind::Identifier, TokenKind::Minus, TokenKind::Number]
        );
    }

    #[test]
    fn test_string_literal_no_escapes() {
        let tokens = tokenize(r#"print("a\n b")"#).unwrap();

        assert!(matches!(tokens[2].kind, TokenKind::StringLiteral));
        assert_eq!(tokens[2].text, r#""a\n b""#);
    }

    #[test]
    fn test_invalid_character() {
        let err = tokenize("x <- 1\ny <- $").unwrap_err();

        assert_eq!(err.character, '$');
        assert_eq!(err.offset, 12);
        assert_eq!(err.location.line, 2);
        assert_eq!(err.location.column, 6);
    }

    #[test]
    fn test_unterminated_string_is_error() {
        let err = tokenize("print(\"oops)").unwrap_err();
        assert_eq!(err.character, '"');
    }

    #[test]
    fn test_string_stops_at_line_end() {
        let err = tokenize("print(\"a\nb\")").unwrap_err();

        assert_eq!(err.character, '"');
        assert_eq!(err.offset, 6);
        assert_eq!(err.location.line, 1);
        assert_eq!(err.location.column, 7);
    }

    #[test]
    fn test_locations_track_lines() {
        let tokens = tokenize("  a\n\tb").unwrap();

        assert_eq!(tokens[0].location, SourceLocation::new(1, 3, 2));
        assert_eq!(tokens[1].location, SourceLocation::new(2, 2, 5));
    }

    #[test]
    fn test_histogram() {
        let tokens = tokenize("a <- b + c + 1").unwrap();
        let counts = token_histogram(&tokens);

        assert_eq!(counts[&TokenKind::Identifier], 3);
        assert_eq!(counts[&TokenKind::Plus], 2);
        assert_eq!(counts.get(&TokenKind::If), None);
    }
}
