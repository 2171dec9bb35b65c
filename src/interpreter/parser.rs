/// Parser entry points and shared definitions.
///
/// Declares `ParseResult`, the nesting limit, and the functions that start
/// parsing a whole program, an expression, or a block of statements.
pub mod core;

/// Token cursor.
///
/// `TokenStream` wraps the token slice and offers `peek`/`accept`/`expect`
/// helpers that test upcoming tokens against literal text or token kinds.
pub mod stream;

/// Top level declarations.
///
/// Parses global fields (`LET`) and method definitions (`DEF`).
pub mod source;

/// Statement parsing.
///
/// Handles declarations, assignments, expression statements, `IF`, `FOR`,
/// `WHILE` and `RETURN`.
pub mod statement;

/// Binary operator parsing.
///
/// One function per precedence level, from `AND`/`OR` down to `*` and `/`.
pub mod binary;

/// Primary expressions.
///
/// Literals, parenthesized groups, variable accesses, calls, and the
/// receiver chains built with `.`.
pub mod primary;

/// Utility functions for the parser.
pub mod utils;
