//! Canonical text rendering of a parsed program
//!
//! Rendering is a separate pass over the tree. Each construct mirrors its
//! source shape: keyword, delimiters, and nested bodies on the following line
//! indented by one tab per nesting level.
//!
//! ```text
//! x <- 2 + 3                     x = 2 + 3
//! if (a < b) then do c <- 1      if (a < b) then do
//!                                	c = 1
//! ```

use crate::parser::ast::*;
use std::fmt::{self, Write};

/// Render every statement, each followed by a newline.
pub fn render_program(program: &Program) -> String {
    let mut out = String::new();
    for stmt in &program.nodes {
        // Writing to a String cannot fail
        let _ = write_stmt(&mut out, stmt, 0);
        out.push('\n');
    }
    out
}

/// Render a single statement at nesting depth zero, without a trailing newline.
pub fn render_statement(stmt: &Stmt) -> String {
    stmt.to_string()
}

fn write_indent(out: &mut impl Write, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        out.write_char('\t')?;
    }
    Ok(())
}

/// Newline, indentation for `depth + 1`, then the body itself.
fn write_body(out: &mut impl Write, body: &Stmt, depth: usize) -> fmt::Result {
    out.write_char('\n')?;
    write_indent(out, depth + 1)?;
    write_stmt(out, body, depth + 1)
}

fn write_list<T: fmt::Display>(out: &mut impl Write, items: &[T], separator: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.write_str(separator)?;
        }
        write!(out, "{}", item)?;
    }
    Ok(())
}

/// Write `stmt` assuming the caller already indented its first line.
fn write_stmt(out: &mut impl Write, stmt: &Stmt, depth: usize) -> fmt::Result {
    match stmt {
        Stmt::Assign { name, value, .. } => write!(out, "{} = {}", name, value),
        Stmt::Call { name, args, .. } => {
            write!(out, "{}(", name)?;
            write_list(out, args, ", ")?;
            out.write_char(')')
        }
        Stmt::FunctionDef {
            name, params, body, ..
        } => {
            write!(out, "function {}(", name)?;
            write_list(out, params, ", ")?;
            out.write_str(") do")?;
            write_body(out, body, depth)
        }
        Stmt::If {
            condition,
            then_branch,
            else_branch,
            ..
        } => {
            write!(out, "if {} then do", condition)?;
            write_body(out, then_branch, depth)?;
            if let Some(else_branch) = else_branch {
                out.write_char('\n')?;
                write_indent(out, depth)?;
                out.write_str("else do")?;
                write_body(out, else_branch, depth)?;
            }
            Ok(())
        }
        Stmt::While {
            condition, body, ..
        } => {
            write!(out, "while {} do", condition)?;
            write_body(out, body, depth)
        }
        Stmt::DoWhile {
            body, condition, ..
        } => {
            out.write_str("do")?;
            write_body(out, body, depth)?;
            out.write_char('\n')?;
            write_indent(out, depth)?;
            write!(out, "while {}", condition)
        }
        Stmt::ForRange {
            iterator,
            lower,
            step,
            upper,
            body,
            ..
        } => {
            write!(out, "for {} in ({}:{}:{}) do", iterator, lower, step, upper)?;
            write_body(out, body, depth)
        }
        Stmt::ForList {
            iterator,
            values,
            body,
            ..
        } => {
            write!(out, "for {} in [", iterator)?;
            write_list(out, values, ",")?;
            out.write_str("] do")?;
            write_body(out, body, depth)
        }
        Stmt::Print { value, .. } => write!(out, "print({})", value),
        Stmt::Return { value, .. } => write!(out, "return {}", value),
    }
}

/// Parenthesize `operand` when printing it bare would re-associate the tree.
fn write_operand(
    f: &mut fmt::Formatter<'_>,
    operand: &Expr,
    parent: BinOp,
    is_right: bool,
) -> fmt::Result {
    let needs_parens = match operand {
        Expr::Binary { op, .. } => {
            op.precedence() < parent.precedence()
                || (is_right && op.precedence() == parent.precedence())
        }
        _ => false,
    };

    if needs_parens {
        write!(f, "({})", operand)
    } else {
        write!(f, "{}", operand)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n, _) => write!(f, "{}", n),
            Expr::Str(s, _) => f.write_str(s),
            Expr::Ident(name, _) => f.write_str(name),
            Expr::Binary {
                op, left, right, ..
            } => {
                write_operand(f, left, *op, false)?;
                write!(f, " {} ", op.symbol())?;
                write_operand(f, right, *op, true)
            }
            Expr::Call { name, args, .. } => {
                write!(f, "{}(", name)?;
                write_list(f, args, ",")?;
                f.write_char(')')
            }
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.left, self.op.symbol(), self.right)
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_stmt(f, self, 0)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_program(self))
    }
}
