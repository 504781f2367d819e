// AST (Abstract Syntax Tree) definitions for the pseudocode normalizer

use crate::parser::lexer::TokenKind;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
    /// Byte offset into the original source
    pub offset: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }

    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::Add | BinOp::Sub => 1,
            BinOp::Mul | BinOp::Div => 2,
        }
    }
}

/// Comparison operators, only valid inside a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    /// The comparison a token spells, if any.
    pub fn from_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::EqEq => Some(CmpOp::Eq),
            TokenKind::NotEq => Some(CmpOp::Ne),
            TokenKind::Lt => Some(CmpOp::Lt),
            TokenKind::Le => Some(CmpOp::Le),
            TokenKind::Gt => Some(CmpOp::Gt),
            TokenKind::Ge => Some(CmpOp::Ge),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }
}

/// Expression nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Integer value; any fractional digits in the source are dropped.
    Number(i64, SourceLocation),
    /// String literal, surrounding quotes included.
    Str(String, SourceLocation),
    Ident(String, SourceLocation),
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        location: SourceLocation,
    },
    Call {
        name: String,
        args: Vec<Expr>,
        location: SourceLocation,
    },
}

impl Expr {
    /// Get the source location of this node
    pub fn location(&self) -> &SourceLocation {
        match self {
            Expr::Number(_, loc) => loc,
            Expr::Str(_, loc) => loc,
            Expr::Ident(_, loc) => loc,
            Expr::Binary { location, .. } => location,
            Expr::Call { location, .. } => location,
        }
    }
}

/// `( left OP right )`
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub left: Expr,
    pub op: CmpOp,
    pub right: Expr,
    pub location: SourceLocation,
}

/// Statement nodes. Every compound body is exactly one nested statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assign {
        name: String,
        value: Expr,
        location: SourceLocation,
    },
    Call {
        name: String,
        args: Vec<Expr>,
        location: SourceLocation,
    },
    FunctionDef {
        name: String,
        params: Vec<String>,
        body: Box<Stmt>,
        location: SourceLocation,
    },
    If {
        condition: Condition,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
        location: SourceLocation,
    },
    While {
        condition: Condition,
        body: Box<Stmt>,
        location: SourceLocation,
    },
    DoWhile {
        body: Box<Stmt>,
        condition: Condition,
        location: SourceLocation,
    },
    ForRange {
        iterator: String,
        lower: Expr,
        step: Expr,
        upper: Expr,
        body: Box<Stmt>,
        location: SourceLocation,
    },
    ForList {
        iterator: String,
        values: Vec<i64>,
        body: Box<Stmt>,
        location: SourceLocation,
    },
    Print {
        value: Expr,
        location: SourceLocation,
    },
    Return {
        value: Expr,
        location: SourceLocation,
    },
}

impl Stmt {
    /// Get the source location of this node
    pub fn location(&self) -> &SourceLocation {
        match self {
            Stmt::Assign { location, .. } => location,
            Stmt::Call { location, .. } => location,
            Stmt::FunctionDef { location, .. } => location,
            Stmt::If { location, .. } => location,
            Stmt::While { location, .. } => location,
            Stmt::DoWhile { location, .. } => location,
            Stmt::ForRange { location, .. } => location,
            Stmt::ForList { location, .. } => location,
            Stmt::Print { location, .. } => location,
            Stmt::Return { location, .. } => location,
        }
    }
}

/// Top-level program structure
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub nodes: Vec<Stmt>, // Top-level statements in source order
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmp_op_from_kind() {
        assert_eq!(CmpOp::from_kind(TokenKind::Le), Some(CmpOp::Le));
        assert_eq!(CmpOp::from_kind(TokenKind::NotEq), Some(CmpOp::Ne));
        assert_eq!(CmpOp::from_kind(TokenKind::Assign), None);
        assert_eq!(CmpOp::from_kind(TokenKind::Minus), None);
    }
}
