//! Pseudocode source parser
//!
//! This module transforms pseudocode source text into a syntax tree and renders
//! that tree back out as canonical text:
//! - [`lexer`]: Tokenization (source text → tokens), driven by an ordered catalog
//! - [`parse`]: Parser struct, errors, configuration, program driver
//! - `expressions` / `statements`: the recursive descent grammar
//! - [`ast`]: Syntax tree definitions
//! - [`render`]: Canonical text rendering (tree → normalized string)
//! - [`trace`]: Diagnostic sinks fed by the grammar rules
//!
//! # Supported Language
//!
//! - Statements: `x <- expr`, `f(a, b)`, `function f(a) do ...`, `if (...) then do ... else do ...`,
//!   `while (...) do ...`, `do ... while (...)`, `for i in (lo:step:hi) do ...`,
//!   `for i in [1, 2] do ...`, `print(expr)`, `return expr`
//! - Expressions: integers, string literals, identifiers, calls, `+ - * /`, parentheses
//! - Conditions: exactly one comparison (`== != < <= > >=`) wrapped in parentheses
//!
//! # Parser Implementation
//!
//! Hand-written fail-fast recursive descent parser; the first error aborts the parse.
//! No external parser generator dependencies.

pub mod ast;
mod expressions;
pub mod lexer;
pub mod parse;
pub mod render;
mod statements;
pub mod trace;
