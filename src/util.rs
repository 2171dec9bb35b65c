/// Escape sequence decoding for character and string literals.
///
/// The lexer only validates escapes; the parser strips the surrounding quotes
/// and decodes them with this module when it builds a literal.
pub mod escape;
/// Numeric literal helpers.
///
/// This module parses integer and decimal literal text into their runtime
/// representations and checks the range limits the analyzer enforces on
/// literals, without risking silent data loss.
pub mod num;
