//! Statement parsing implementation
//!
//! This module handles parsing of every statement form, dispatching purely on
//! the first lookahead token:
//!
//! - Assignment: `x <- expr`
//! - Call statement: `f(a, b)`
//! - Function definition: `function f(a, b) do <stmt>`
//! - Control flow: `if`, `while`, `do`-`while`, `for`
//! - `print(expr)` and `return expr`
//!
//! # Grammar
//!
//! ```text
//! statement ::= IDENT '<-' expression
//!             | IDENT '(' arguments ')'
//!             | 'function' IDENT '(' params ')' 'do' statement
//!             | 'if' condition 'then' 'do' statement ('else' 'do' statement)?
//!             | 'while' condition 'do' statement
//!             | 'do' statement 'while' condition
//!             | 'for' IDENT 'in' range 'do' statement
//!             | 'print' '(' expression ')'
//!             | 'return' expression
//! condition ::= '(' expression COMPARISON expression ')'
//! range     ::= '(' expression ':' expression ':' expression ')'
//!             | '[' NUMBER* ']'
//! ```
//!
//! Bodies are a single nested statement.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::expressions::parse_number;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser, SeparatorPolicy};
use crate::parser::trace::Rule;

impl Parser {
    /// Parse one statement
    pub fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        self.traced(Rule::Statement, |p| match p.peek_kind() {
            Some(TokenKind::Identifier) => {
                if p.check_ahead(1, TokenKind::Assign) {
                    p.parse_assignment()
                } else if p.check_ahead(1, TokenKind::LParen) {
                    p.parse_call_statement()
                } else {
                    p.advance();
                    Err(p.error("expected assignment or function call"))
                }
            }
            Some(TokenKind::Function) => p.parse_function_definition(),
            Some(TokenKind::If) => p.parse_if_statement(),
            Some(TokenKind::While) => p.parse_while_statement(),
            Some(TokenKind::Do) => p.parse_do_while_statement(),
            Some(TokenKind::For) => p.parse_for_statement(),
            Some(TokenKind::Print) => p.parse_print_statement(),
            Some(TokenKind::Return) => p.parse_return_statement(),
            _ => Err(p.error("expected statement")),
        })
    }

    /// Parse assignment: name <- expr
    fn parse_assignment(&mut self) -> Result<Stmt, ParseError> {
        self.traced(Rule::Assignment, |p| {
            let loc = p.current_location();
            let name = p.expect_identifier("expected variable name")?;
            p.expect_token(TokenKind::Assign, "expected '<-' after variable name")?;
            let value = p.parse_expression()?;

            Ok(Stmt::Assign {
                name,
                value,
                location: loc,
            })
        })
    }

    /// Parse call statement: name(arg, arg, ...), commas required between
    /// arguments and one trailing comma allowed
    fn parse_call_statement(&mut self) -> Result<Stmt, ParseError> {
        self.traced(Rule::CallStatement, |p| {
            let loc = p.current_location();
            let name = p.expect_identifier("expected function name")?;
            p.expect_token(TokenKind::LParen, "expected '(' after function name")?;

            let args = p.parse_separated(
                SeparatorPolicy::Trailing,
                TokenKind::RParen,
                "argument",
                |p| p.parse_expression(),
            )?;

            p.expect_token(
                TokenKind::RParen,
                "expected ')' after function call arguments",
            )?;

            Ok(Stmt::Call {
                name,
                args,
                location: loc,
            })
        })
    }

    /// Parse function definition: function name(params) do body
    fn parse_function_definition(&mut self) -> Result<Stmt, ParseError> {
        self.traced(Rule::FunctionDef, |p| {
            let loc = p.current_location();
            p.expect_token(TokenKind::Function, "expected 'function'")?;

            let name = p.expect_identifier("expected function name")?;
            p.expect_token(TokenKind::LParen, "expected '(' after function name")?;

            let policy = p.config.separators;
            let params = p.parse_separated(policy, TokenKind::RParen, "parameter", |p| {
                p.expect_identifier("expected parameter name")
            })?;

            p.expect_token(
                TokenKind::RParen,
                "expected ')' after function parameters",
            )?;
            p.expect_token(TokenKind::Do, "expected 'do' after function parameters")?;

            let body = p.parse_body()?;

            Ok(Stmt::FunctionDef {
                name,
                params,
                body,
                location: loc,
            })
        })
    }

    /// Parse if statement: if cond then do body [else do body]
    fn parse_if_statement(&mut self) -> Result<Stmt, ParseError> {
        self.traced(Rule::If, |p| {
            let loc = p.current_location();
            p.expect_token(TokenKind::If, "expected 'if'")?;

            let condition = p.parse_condition()?;
            p.expect_token(TokenKind::Then, "expected 'then' after condition")?;
            p.expect_token(TokenKind::Do, "expected 'do' after 'then'")?;
            let then_branch = p.parse_body()?;

            let else_branch = if p.match_token(TokenKind::Else) {
                p.expect_token(TokenKind::Do, "expected 'do' after 'else'")?;
                Some(p.parse_body()?)
            } else {
                None
            };

            Ok(Stmt::If {
                condition,
                then_branch,
                else_branch,
                location: loc,
            })
        })
    }

    /// Parse while statement: while cond do body
    fn parse_while_statement(&mut self) -> Result<Stmt, ParseError> {
        self.traced(Rule::While, |p| {
            let loc = p.current_location();
            p.expect_token(TokenKind::While, "expected 'while'")?;

            let condition = p.parse_condition()?;
            p.expect_token(TokenKind::Do, "expected 'do' after while condition")?;
            let body = p.parse_body()?;

            Ok(Stmt::While {
                condition,
                body,
                location: loc,
            })
        })
    }

    /// Parse do-while statement: do body while cond
    fn parse_do_while_statement(&mut self) -> Result<Stmt, ParseError> {
        self.traced(Rule::DoWhile, |p| {
            let loc = p.current_location();
            p.expect_token(TokenKind::Do, "expected 'do'")?;

            let body = p.parse_body()?;
            p.expect_token(TokenKind::While, "expected 'while' after do body")?;
            let condition = p.parse_condition()?;

            Ok(Stmt::DoWhile {
                body,
                condition,
                location: loc,
            })
        })
    }

    /// Parse for statement over a range `(lower:step:upper)` or a list `[1, 2]`
    fn parse_for_statement(&mut self) -> Result<Stmt, ParseError> {
        self.traced(Rule::For, |p| {
            let loc = p.current_location();
            p.expect_token(TokenKind::For, "expected 'for'")?;

            let iterator = p.expect_identifier("expected iterator after 'for'")?;
            p.expect_token(TokenKind::In, "expected 'in' after iterator")?;

            if p.match_token(TokenKind::LParen) {
                let lower = p.parse_expression()?;
                p.expect_token(TokenKind::Colon, "expected ':' after lower bound")?;
                let step = p.parse_expression()?;
                p.expect_token(TokenKind::Colon, "expected ':' after increment")?;
                let upper = p.parse_expression()?;
                p.expect_token(TokenKind::RParen, "expected ')' after range")?;
                p.expect_token(TokenKind::Do, "expected 'do' after for loop range")?;
                let body = p.parse_body()?;

                Ok(Stmt::ForRange {
                    iterator,
                    lower,
                    step,
                    upper,
                    body,
                    location: loc,
                })
            } else if p.match_token(TokenKind::LBracket) {
                let policy = p.config.separators;
                let values = p.parse_separated(policy, TokenKind::RBracket, "number", |p| {
                    let token = p.expect_token(TokenKind::Number, "expected number in list")?;
                    parse_number(&token)
                })?;
                p.expect_token(TokenKind::RBracket, "expected ']' after list")?;
                p.expect_token(TokenKind::Do, "expected 'do' after for loop list")?;
                let body = p.parse_body()?;

                Ok(Stmt::ForList {
                    iterator,
                    values,
                    body,
                    location: loc,
                })
            } else {
                Err(p.error("expected '(' or '[' after 'in'"))
            }
        })
    }

    /// Parse print statement: print(expr)
    fn parse_print_statement(&mut self) -> Result<Stmt, ParseError> {
        self.traced(Rule::Print, |p| {
            let loc = p.current_location();
            p.expect_token(TokenKind::Print, "expected 'print'")?;
            p.expect_token(TokenKind::LParen, "expected '(' after 'print'")?;
            let value = p.parse_expression()?;
            p.expect_token(TokenKind::RParen, "expected ')' after print argument")?;

            Ok(Stmt::Print {
                value,
                location: loc,
            })
        })
    }

    /// Parse return statement: return expr
    fn parse_return_statement(&mut self) -> Result<Stmt, ParseError> {
        self.traced(Rule::Return, |p| {
            let loc = p.current_location();
            p.expect_token(TokenKind::Return, "expected 'return'")?;
            let value = p.parse_expression()?;

            Ok(Stmt::Return {
                value,
                location: loc,
            })
        })
    }

    /// Parse condition: ( expr OP expr )
    fn parse_condition(&mut self) -> Result<Condition, ParseError> {
        self.traced(Rule::Condition, |p| {
            let loc = p.current_location();
            p.expect_token(TokenKind::LParen, "expected '(' before condition")?;

            let left = p.parse_expression()?;
            let op = p
                .peek_kind()
                .and_then(CmpOp::from_kind)
                .ok_or_else(|| p.error("expected comparison operator"))?;
            p.advance();
            let right = p.parse_expression()?;

            p.expect_token(TokenKind::RParen, "expected ')' after condition")?;

            Ok(Condition {
                left,
                op,
                right,
                location: loc,
            })
        })
    }

    /// Parse a compound-statement body (exactly one nested statement)
    fn parse_body(&mut self) -> Result<Box<Stmt>, ParseError> {
        self.parse_statement().map(Box::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;
    use crate::parser::parse::ParserConfig;

    fn stmt(source: &str) -> Stmt {
        let mut parser = Parser::new(tokenize(source).unwrap());
        let stmt = parser.parse_statement().unwrap();
        assert!(parser.is_at_end(), "unconsumed tokens in {:?}", source);
        stmt
    }

    fn stmt_err(source: &str) -> ParseError {
        let mut parser = Parser::new(tokenize(source).unwrap());
        parser.parse_statement().unwrap_err()
    }

    fn strict() -> ParserConfig {
        ParserConfig {
            separators: SeparatorPolicy::Strict,
            ..ParserConfig::default()
        }
    }

    #[test]
    fn test_assignment() {
        match stmt("total <- a + b * 2") {
            Stmt::Assign { name, value, .. } => {
                assert_eq!(name, "total");
                assert!(matches!(value, Expr::Binary { op: BinOp::Add, .. }));
            }
            other => panic!("Expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_call_statement() {
        match stmt("add(1, 2)") {
            Stmt::Call { name, args, .. } => {
                assert_eq!(name, "add");
                assert_eq!(args.len(), 2);
            }
            other => panic!("Expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_call_statement_requires_commas() {
        let err = stmt_err("add(1 2)");
        assert_eq!(err.expected, "expected ',' after argument");

        let err = stmt_err("add(1 2,)");
        assert_eq!(err.expected, "expected ',' after argument");

        let err = stmt_err("add(1,,)");
        assert_eq!(err.expected, "expected expression");
    }

    #[test]
    fn test_call_statement_trailing_comma() {
        let trailing = stmt("add(1, 2,)");
        assert_eq!(trailing, stmt("add(1, 2)"));
        assert_eq!(trailing.to_string(), "add(1, 2)");

        match stmt("noop(x,)") {
            Stmt::Call { args, .. } => assert_eq!(args.len(), 1),
            other => panic!("Expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_identifier_without_assignment_or_call() {
        let err = stmt_err("x + 1");
        assert_eq!(err.expected, "expected assignment or function call");
        assert_eq!(err.found.map(|t| t.kind), Some(TokenKind::Plus));
    }

    #[test]
    fn test_function_definition() {
        match stmt("function add(x, y) do return x + y") {
            Stmt::FunctionDef {
                name, params, body, ..
            } => {
                assert_eq!(name, "add");
                assert_eq!(params, vec!["x".to_string(), "y".to_string()]);
                assert!(matches!(*body, Stmt::Return { .. }));
            }
            other => panic!("Expected function definition, got {:?}", other),
        }
    }

    #[test]
    fn test_function_parameters_strict() {
        let tokens = tokenize("function f(a b) do return a").unwrap();
        let mut parser = Parser::with_config(tokens, strict());
        let err = parser.parse_statement().unwrap_err();
        assert_eq!(err.expected, "expected ',' after parameter");
    }

    #[test]
    fn test_if_else() {
        match stmt("if (a < b) then do c <- 1 else do c <- 2") {
            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                assert_eq!(condition.op, CmpOp::Lt);
                assert!(matches!(*then_branch, Stmt::Assign { .. }));
                assert!(else_branch.is_some());
            }
            other => panic!("Expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_if_requires_then_do() {
        assert_eq!(
            stmt_err("if (a < b) do c <- 1").expected,
            "expected 'then' after condition"
        );
        assert_eq!(
            stmt_err("if (a < b) then c <- 1").expected,
            "expected 'do' after 'then'"
        );
        assert_eq!(
            stmt_err("if (a < b) then do c <- 1 else c <- 2").expected,
            "expected 'do' after 'else'"
        );
    }

    #[test]
    fn test_condition_shape() {
        assert_eq!(
            stmt_err("while (a) do x <- 1").expected,
            "expected comparison operator"
        );
        assert_eq!(
            stmt_err("while a < b do x <- 1").expected,
            "expected '(' before condition"
        );
        assert_eq!(
            stmt_err("while (a < b do x <- 1").expected,
            "expected ')' after condition"
        );
    }

    #[test]
    fn test_while_and_do_while() {
        assert!(matches!(stmt("while (i <= 10) do i <- i + 1"), Stmt::While { .. }));

        match stmt("do i <- i + 1 while (i != 3)") {
            Stmt::DoWhile { condition, .. } => assert_eq!(condition.op, CmpOp::Ne),
            other => panic!("Expected do-while, got {:?}", other),
        }
    }

    #[test]
    fn test_for_range() {
        match stmt("for i in (0:2:n - 1) do print(i)") {
            Stmt::ForRange {
                iterator,
                lower,
                upper,
                ..
            } => {
                assert_eq!(iterator, "i");
                assert!(matches!(lower, Expr::Number(0, _)));
                assert!(matches!(upper, Expr::Binary { op: BinOp::Sub, .. }));
            }
            other => panic!("Expected for range, got {:?}", other),
        }
    }

    #[test]
    fn test_for_list_with_and_without_commas() {
        for source in ["for i in [1, 2, 3] do print(i)", "for i in [1 2, 3] do print(i)"] {
            match stmt(source) {
                Stmt::ForList { values, .. } => assert_eq!(values, vec![1, 2, 3]),
                other => panic!("Expected for list, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_for_list_strict() {
        let tokens = tokenize("for i in [1 2] do print(i)").unwrap();
        let mut parser = Parser::with_config(tokens, strict());
        let err = parser.parse_statement().unwrap_err();
        assert_eq!(err.expected, "expected ',' after number");

        let tokens = tokenize("for i in [1, 2] do print(i)").unwrap();
        let mut parser = Parser::with_config(tokens, strict());
        assert!(parser.parse_statement().is_ok());
    }

    #[test]
    fn test_for_list_rejects_non_numbers() {
        assert_eq!(
            stmt_err("for i in [1, x] do print(i)").expected,
            "expected number in list"
        );
    }

    #[test]
    fn test_for_missing_range() {
        assert_eq!(
            stmt_err("for i in x do print(i)").expected,
            "expected '(' or '[' after 'in'"
        );
    }

    #[test]
    fn test_missing_body_at_end() {
        let err = stmt_err("while (a < b) do");
        assert_eq!(err.expected, "expected statement");
        assert!(err.found.is_none());
    }

    #[test]
    fn test_unknown_statement_start() {
        let err = stmt_err("else do x <- 1");
        assert_eq!(err.expected, "expected statement");
    }
}
