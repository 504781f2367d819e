//! Expression parsing implementation
//!
//! Three mutually recursive rules encode precedence, lowest-binding first:
//!
//! ```text
//! expression ::= term   (('+' | '-') term)*
//! term       ::= factor (('*' | '/') factor)*
//! factor     ::= '(' expression ')' | STRING | NUMBER
//!              | IDENT '(' arguments ')' | IDENT
//! ```
//!
//! Both binary levels fold every consecutive operator into a left-leaning
//! tree, so `a - b - c` parses as `(a - b) - c`.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::parse::{ParseError, Parser, SeparatorPolicy};
use crate::parser::trace::Rule;

impl Parser {
    /// Parse expression (additive level, top-level entry point)
    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.traced(Rule::Expression, |p| {
            let mut left = p.parse_term()?;

            loop {
                let loc = p.current_location();
                let op = match p.peek_kind() {
                    Some(TokenKind::Plus) => BinOp::Add,
                    Some(TokenKind::Minus) => BinOp::Sub,
                    _ => break,
                };
                p.advance();

                let right = Box::new(p.parse_term()?);
                left = Expr::Binary {
                    op,
                    left: Box::new(left),
                    right,
                    location: loc,
                };
            }

            Ok(left)
        })
    }

    /// Parse multiplicative (* /)
    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        self.traced(Rule::Term, |p| {
            let mut left = p.parse_factor()?;

            loop {
                let loc = p.current_location();
                let op = match p.peek_kind() {
                    Some(TokenKind::Star) => BinOp::Mul,
                    Some(TokenKind::Slash) => BinOp::Div,
                    _ => break,
                };
                p.advance();

                let right = Box::new(p.parse_factor()?);
                left = Expr::Binary {
                    op,
                    left: Box::new(left),
                    right,
                    location: loc,
                };
            }

            Ok(left)
        })
    }

    /// Parse factor (parenthesized expressions, literals, calls, identifiers)
    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        self.traced(Rule::Factor, |p| {
            let loc = p.current_location();

            match p.peek_kind() {
                Some(TokenKind::LParen) => {
                    p.advance();
                    let expr = p.parse_expression()?;
                    p.expect_token(TokenKind::RParen, "expected ')' after expression")?;
                    Ok(expr)
                }
                Some(TokenKind::StringLiteral) => {
                    let token = p.expect_token(TokenKind::StringLiteral, "expected string")?;
                    Ok(Expr::Str(token.text, loc))
                }
                Some(TokenKind::Number) => {
                    let token = p.expect_token(TokenKind::Number, "expected number")?;
                    let value = parse_number(&token)?;
                    Ok(Expr::Number(value, loc))
                }
                Some(TokenKind::Identifier) if p.check_ahead(1, TokenKind::LParen) => {
                    p.parse_call_expression()
                }
                Some(TokenKind::Identifier) => {
                    let name = p.expect_identifier("expected identifier")?;
                    Ok(Expr::Ident(name, loc))
                }
                _ => Err(p.error("expected expression")),
            }
        })
    }

    /// Parse function call expression: name(arg, arg, ...)
    fn parse_call_expression(&mut self) -> Result<Expr, ParseError> {
        self.traced(Rule::Call, |p| {
            let loc = p.current_location();
            let name = p.expect_identifier("expected function name")?;
            p.expect_token(TokenKind::LParen, "expected '(' after function name")?;

            let policy = p.config.separators;
            let args = p.parse_separated(policy, TokenKind::RParen, "argument", |p| {
                p.parse_expression()
            })?;

            p.expect_token(
                TokenKind::RParen,
                "expected ')' after function call arguments",
            )?;

            Ok(Expr::Call {
                name,
                args,
                location: loc,
            })
        })
    }

    /// Parse comma-separated elements up to (not including) `close`.
    ///
    /// Under [`SeparatorPolicy::Lenient`] commas may be missing or trailing;
    /// the other policies require one between elements.
    pub(crate) fn parse_separated<T>(
        &mut self,
        policy: SeparatorPolicy,
        close: TokenKind,
        element_name: &str,
        mut element: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        let mut items = Vec::new();

        while !self.check(close) {
            items.push(element(self)?);

            if self.match_token(TokenKind::Comma) {
                if policy == SeparatorPolicy::Strict && self.check(close) {
                    return Err(self.error(format!("expected {} after ','", element_name)));
                }
            } else if policy != SeparatorPolicy::Lenient && !self.check(close) {
                return Err(self.error(format!("expected ',' after {}", element_name)));
            }
        }

        Ok(items)
    }
}

/// Integer value of a numeric literal; fractional digits are dropped.
pub(crate) fn parse_number(token: &Token) -> Result<i64, ParseError> {
    let integer_part = token.text.split('.').next().unwrap_or(&token.text);
    integer_part.parse::<i64>().map_err(|_| ParseError {
        expected: "expected number within 64-bit range".to_string(),
        found: Some(token.clone()),
        location: token.location,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;
    use crate::parser::parse::ParserConfig;

    fn expr(source: &str) -> Expr {
        let mut parser = Parser::new(tokenize(source).unwrap());
        let expr = parser.parse_expression().unwrap();
        assert!(parser.is_at_end(), "unconsumed tokens in {:?}", source);
        expr
    }

    fn expr_err(source: &str) -> ParseError {
        let mut parser = Parser::new(tokenize(source).unwrap());
        parser.parse_expression().unwrap_err()
    }

    #[test]
    fn test_precedence() {
        match expr("1 + 2 * 3") {
            Expr::Binary {
                op: BinOp::Add,
                left,
                right,
                ..
            } => {
                assert!(matches!(*left, Expr::Number(1, _)));
                assert!(matches!(*right, Expr::Binary { op: BinOp::Mul, .. }));
            }
            other => panic!("Expected addition, got {:?}", other),
        }
    }

    #[test]
    fn test_chained_operators_fold_left() {
        // (a - b) - c, all three operands consumed
        match expr("a - b - c") {
            Expr::Binary {
                op: BinOp::Sub,
                left,
                right,
                ..
            } => {
                assert!(matches!(*left, Expr::Binary { op: BinOp::Sub, .. }));
                assert!(matches!(*right, Expr::Ident(ref s, _) if s == "c"));
            }
            other => panic!("Expected subtraction, got {:?}", other),
        }

        match expr("8 / 4 * 2") {
            Expr::Binary {
                op: BinOp::Mul,
                left,
                ..
            } => assert!(matches!(*left, Expr::Binary { op: BinOp::Div, .. })),
            other => panic!("Expected multiplication, got {:?}", other),
        }
    }

    #[test]
    fn test_parenthesized() {
        assert!(matches!(
            expr("(1 + 2) * 3"),
            Expr::Binary { op: BinOp::Mul, .. }
        ));
    }

    #[test]
    fn test_number_truncates() {
        assert!(matches!(expr("3.5"), Expr::Number(3, _)));
        assert!(matches!(expr("-7.9"), Expr::Number(-7, _)));
    }

    #[test]
    fn test_number_overflow() {
        let err = expr_err("99999999999999999999");
        assert!(err.expected.contains("64-bit"));
    }

    #[test]
    fn test_string_literal_keeps_quotes() {
        assert!(matches!(expr("\"hi\""), Expr::Str(ref s, _) if s == "\"hi\""));
    }

    #[test]
    fn test_numeric_operands_multiply() {
        assert!(matches!(expr("2 * 3"), Expr::Binary { op: BinOp::Mul, .. }));
    }

    #[test]
    fn test_call_as_operand() {
        match expr("add(1, x) + 2") {
            Expr::Binary { left, .. } => match *left {
                Expr::Call { name, args, .. } => {
                    assert_eq!(name, "add");
                    assert_eq!(args.len(), 2);
                }
                other => panic!("Expected call, got {:?}", other),
            },
            other => panic!("Expected addition, got {:?}", other),
        }
    }

    #[test]
    fn test_call_lenient_separators() {
        assert!(matches!(expr("f(1 2,)"), Expr::Call { ref args, .. } if args.len() == 2));
        assert!(matches!(expr("f()"), Expr::Call { ref args, .. } if args.is_empty()));
    }

    #[test]
    fn test_call_strict_separators() {
        let config = ParserConfig {
            separators: SeparatorPolicy::Strict,
            ..ParserConfig::default()
        };

        let mut parser = Parser::with_config(tokenize("f(1 2)").unwrap(), config);
        let err = parser.parse_expression().unwrap_err();
        assert_eq!(err.expected, "expected ',' after argument");

        let mut parser = Parser::with_config(tokenize("f(1,)").unwrap(), config);
        let err = parser.parse_expression().unwrap_err();
        assert_eq!(err.expected, "expected argument after ','");
    }

    #[test]
    fn test_incomplete_expression() {
        let err = expr_err("2 +");
        assert_eq!(err.expected, "expected expression");
        assert!(err.found.is_none());
    }

    #[test]
    fn test_missing_close_paren() {
        let err = expr_err("(1 + 2");
        assert_eq!(err.expected, "expected ')' after expression");
    }
}
