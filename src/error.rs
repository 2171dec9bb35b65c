/// Lexing errors.
///
/// Raised while turning source text into tokens: malformed character
/// literals and unterminated strings.
pub mod lex_error;
/// Parsing errors.
///
/// Defines all error types that can occur while building the syntax tree:
/// unexpected tokens, missing keywords or punctuation, and literals that do
/// not fit their runtime representation.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation and
/// execution, such as division by zero, unresolvable names, or operands of
/// the wrong type.
pub mod runtime_error;
/// Static type errors.
///
/// Raised by the analyzer when a program would violate the type rules before
/// it is executed.
pub mod type_error;

pub use lex_error::{LexError, LexErrorKind};
pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
pub use type_error::TypeError;
