use thiserror::Error;

/// The ways a token can be malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Error)]
pub enum LexErrorKind {
    /// A character literal without a valid character or escape after `'`.
    #[error("Invalid Character")]
    InvalidCharacter,
    /// A character literal holding more than one character.
    #[error("Mismatched Single Quote")]
    MismatchedSingleQuote,
    /// A string literal without its closing `"`.
    #[error("Unterminated String")]
    UnterminatedString,
    /// Input no token rule accepts.
    #[default]
    #[error("Unexpected Character")]
    UnexpectedCharacter,
}

/// A lexing failure and the offset where scanning stopped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error at offset {offset}: {kind}.")]
pub struct LexError {
    /// What went wrong.
    pub kind:   LexErrorKind,
    /// Offset into the source text.
    pub offset: usize,
}
