use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Represents all errors that can occur during parsing.
pub enum ParseError {
    /// A specific token was required but another one was found.
    #[error("Error at offset {offset}: Expected {expected}, found '{found}'.")]
    Expected {
        /// Description of what was required.
        expected: String,
        /// The text of the token encountered.
        found:    String,
        /// Offset of the token encountered.
        offset:   usize,
    },
    /// The tokens ran out while something was still required.
    #[error("Error at offset {offset}: Expected {expected}, found end of input.")]
    UnexpectedEndOfInput {
        /// Description of what was required.
        expected: String,
        /// Offset just past the last token.
        offset:   usize,
    },
    /// No expression can start with this token.
    #[error("Error at offset {offset}: Invalid expression starting at '{token}'.")]
    InvalidExpression {
        /// The token encountered.
        token:  String,
        /// Offset of the token.
        offset: usize,
    },
    /// A top level token is neither `LET` nor `DEF`.
    #[error("Error at offset {offset}: Expected 'LET' or 'DEF', found '{token}'.")]
    TrailingTokens {
        /// The first token left over.
        token:  String,
        /// Offset of the token.
        offset: usize,
    },
    /// A numeric literal does not fit its runtime representation.
    #[error("Error at offset {offset}: Literal {literal} is out of range.")]
    LiteralOutOfRange {
        /// The literal text.
        literal: String,
        /// Offset of the literal.
        offset:  usize,
    },
    /// Expressions or blocks are nested deeper than the parser allows.
    #[error("Error at offset {offset}: Nesting is too deep.")]
    NestingTooDeep {
        /// Offset of the token where the limit was hit.
        offset: usize,
    },
}

impl ParseError {
    /// Offset into the source text where the error was detected.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::Expected { offset, .. }
            | Self::UnexpectedEndOfInput { offset, .. }
            | Self::InvalidExpression { offset, .. }
            | Self::TrailingTokens { offset, .. }
            | Self::LiteralOutOfRange { offset, .. }
            | Self::NestingTooDeep { offset } => *offset,
        }
    }
}
