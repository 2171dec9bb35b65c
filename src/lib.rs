//! # plc
//!
//! plc is an interpreter for a small, statically checked, procedural
//! language. Source text is lexed, parsed into a syntax tree, type checked by
//! a static analyzer and finally executed by a tree-walking interpreter.
//!
//! A program consists of global fields and methods; running it calls
//! `main()`.
//!
//! ```
//! let mut out = Vec::new();
//! let result = plc::run("DEF main() : Integer DO print(\"Hello, World!\"); RETURN 0; END",
//!                       &mut out).unwrap();
//!
//! assert_eq!(result, plc::interpreter::value::core::Value::from(0));
//! assert_eq!(out, b"Hello, World!\n");
//! ```

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use std::io::Write;

use thiserror::Error;

use crate::{
    ast::Source,
    error::{LexError, ParseError, RuntimeError, TypeError},
    interpreter::{analyzer::core::Analyzer, evaluator::core::Interpreter, value::core::Value},
};

/// Defines the structure of parsed code.
///
/// This module declares the `Source`, `Field`, `Method`, statement and
/// expression types that represent a program as a tree. The tree is built by
/// the parser, annotated by the analyzer and walked by the evaluator.
///
/// # Responsibilities
/// - Defines node types for all language constructs.
/// - Attaches byte offsets to nodes for error reporting.
/// - Holds the static types and bindings the analyzer resolves.
pub mod ast;
/// Provides unified error types for every phase.
///
/// This module defines all errors that can be raised while lexing, parsing,
/// analyzing or evaluating code. Each error carries the byte offset it
/// occurred at.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, analysis, evaluation, value
/// representations and scopes to provide a complete runtime for programs.
///
/// # Responsibilities
/// - Coordinates all core components.
/// - Provides entry points for each phase.
pub mod interpreter;
/// General helpers for literal decoding and numeric range checks.
pub mod util;

pub use interpreter::{lexer::lex, parser::core::parse_source};

/// Any error a program can fail with, whatever phase raised it.
#[derive(Debug, Error)]
pub enum Error {
    /// The source text could not be tokenized.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// The tokens do not form a program.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The program violates the type rules.
    #[error(transparent)]
    Type(#[from] TypeError),
    /// Execution failed.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Type checks a parsed program with the built-in globals, annotating it in
/// place.
///
/// # Example
/// ```
/// let mut source = plc::parse_source(&plc::lex("DEF main() DO RETURN 0; END").unwrap()).unwrap();
///
/// // `main` must declare an `Integer` return type.
/// assert!(plc::analyze(&mut source).is_err());
/// ```
pub fn analyze(source: &mut Source) -> Result<(), TypeError> {
    Analyzer::new().analyze(source)
}

/// Executes a program, printing to standard output, and returns the value
/// of `main()`.
pub fn execute(source: &Source) -> Result<Value, RuntimeError> {
    Interpreter::new().execute(source)
}

/// Lexes, parses, analyzes and executes `program`, writing its output to
/// `out`.
///
/// # Errors
/// Returns the first error of whichever phase failed.
///
/// # Example
/// ```
/// use plc::{Error, error::RuntimeError};
///
/// let result = plc::run("DEF main() : Integer DO RETURN 1 / 0; END", std::io::sink());
///
/// assert!(matches!(result, Err(Error::Runtime(RuntimeError::DivisionByZero { .. }))));
/// ```
pub fn run(program: &str, out: impl Write) -> Result<Value, Error> {
    let tokens = lex(program)?;
    let mut source = parse_source(&tokens)?;
    analyze(&mut source)?;
    let result = Interpreter::with_output(out).execute(&source)?;
    Ok(result)
}
