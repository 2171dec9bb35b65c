use crate::{
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::core::{MAX_PARSE_DEPTH, ParseResult},
    },
};

/// Something a single token can be tested against.
///
/// Keywords and punctuation are matched by their exact text, everything else
/// by its token kind.
pub trait Pattern {
    /// Whether `token` satisfies the pattern.
    fn test(&self, token: &Token) -> bool;

    /// How the pattern is described in error messages.
    fn describe(&self) -> String;
}

impl Pattern for &str {
    fn test(&self, token: &Token) -> bool {
        token.literal == *self
    }

    fn describe(&self) -> String {
        format!("'{self}'")
    }
}

impl Pattern for TokenKind {
    fn test(&self, token: &Token) -> bool {
        token.kind == *self
    }

    fn describe(&self) -> String {
        TokenKind::describe(*self).to_string()
    }
}

/// A cursor over a token slice with pattern based lookahead.
///
/// `peek*` methods never consume; `accept*` methods consume exactly when the
/// matching `peek*` would have returned `true`.
#[derive(Debug)]
pub struct TokenStream<'a> {
    tokens: &'a [Token],
    index:  usize,
    depth:  usize,
}

impl<'a> TokenStream<'a> {
    /// Creates a stream positioned at the first token.
    #[must_use]
    pub const fn new(tokens: &'a [Token]) -> Self {
        Self { tokens,
               index: 0,
               depth: 0 }
    }

    /// The next token, if any.
    #[must_use]
    pub fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.index)
    }

    /// Whether every token has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index >= self.tokens.len()
    }

    /// Tests the next token against `pattern`.
    pub fn peek(&self, pattern: impl Pattern) -> bool {
        self.current().is_some_and(|token| pattern.test(token))
    }

    /// Tests the next `patterns.len()` tokens, one pattern each.
    ///
    /// Returns `false` if fewer tokens remain than patterns are given.
    pub fn peek_sequence(&self, patterns: &[&dyn Pattern]) -> bool {
        let ahead = self.tokens.get(self.index..).unwrap_or_default();

        ahead.len() >= patterns.len()
        && patterns.iter()
                   .zip(ahead)
                   .all(|(pattern, token)| pattern.test(token))
    }

    /// Consumes the next token if it matches `pattern`.
    pub fn accept(&mut self, pattern: impl Pattern) -> bool {
        let matched = self.peek(pattern);
        if matched {
            self.index += 1;
        }
        matched
    }

    /// Consumes the next token unconditionally.
    pub fn advance(&mut self) -> Option<&'a Token> {
        let token = self.current()?;
        self.index += 1;
        Some(token)
    }

    /// Consumes the next token, requiring it to match `pattern`.
    ///
    /// # Errors
    /// Returns `ParseError::Expected` naming the pattern and the token found,
    /// or `ParseError::UnexpectedEndOfInput` if there are no tokens left.
    pub fn expect(&mut self, pattern: impl Pattern) -> ParseResult<&'a Token> {
        match self.current() {
            Some(token) if pattern.test(token) => {
                self.index += 1;
                Ok(token)
            },
            _ => Err(self.error(&pattern.describe())),
        }
    }

    /// Builds the error for a missing `expected` at the current position.
    #[must_use]
    pub fn error(&self, expected: &str) -> ParseError {
        match self.current() {
            Some(token) => ParseError::Expected { expected: expected.to_string(),
                                                  found:    token.literal.clone(),
                                                  offset:   token.offset, },
            None => ParseError::UnexpectedEndOfInput { expected: expected.to_string(),
                                                       offset:   self.end_offset(), },
        }
    }

    /// Offset of the next token, or just past the last one at end of input.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.current().map_or_else(|| self.end_offset(), |token| token.offset)
    }

    fn end_offset(&self) -> usize {
        self.tokens.last().map_or(0, Token::end)
    }

    /// Runs `parse` one nesting level deeper.
    ///
    /// # Errors
    /// Returns `ParseError::NestingTooDeep` once more than
    /// [`MAX_PARSE_DEPTH`] levels are open, otherwise whatever `parse`
    /// returns.
    pub fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= MAX_PARSE_DEPTH {
            return Err(ParseError::NestingTooDeep { offset: self.offset() });
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::lexer::lex;

    #[test]
    fn accept_consumes_only_on_match() {
        let tokens = lex("LET x").unwrap();
        let mut stream = TokenStream::new(&tokens);

        assert!(!stream.accept("DEF"));
        assert!(stream.accept("LET"));
        assert!(stream.peek(TokenKind::Identifier));
        assert!(stream.accept(TokenKind::Identifier));
        assert!(stream.is_empty());
    }

    #[test]
    fn sequences_need_enough_tokens() {
        let tokens = lex("f (").unwrap();
        let stream = TokenStream::new(&tokens);

        assert!(stream.peek_sequence(&[&TokenKind::Identifier, &"("]));
        assert!(!stream.peek_sequence(&[&TokenKind::Identifier, &"(", &")"]));
    }

    #[test]
    fn errors_at_end_point_past_the_last_token() {
        let tokens = lex("RETURN 10").unwrap();
        let mut stream = TokenStream::new(&tokens);
        stream.advance();
        stream.advance();

        assert_eq!(stream.expect(";").unwrap_err(),
                   ParseError::UnexpectedEndOfInput { expected: "';'".to_string(),
                                                      offset:   9, });
    }
}
