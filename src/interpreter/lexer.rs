use logos::Logos;

use crate::error::{LexError, LexErrorKind};

/// The kind of a lexical token.
///
/// Keywords such as `LET` or `END` are ordinary identifiers here; the parser
/// recognises them by comparing token text. At each position the longest
/// matching rule wins, and explicit priorities break ties between identifiers
/// or numbers and the single-character operator rule.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(error = LexErrorKind)]
pub enum TokenKind {
    /// Names and keywords, such as `x`, `my-var` or `WHILE`.
    #[regex(r"[A-Za-z_][A-Za-z0-9_-]*", priority = 3)]
    Identifier,
    /// Integer literals with an optional sign directly attached: `42`, `-7`.
    #[regex(r"[+-]?[0-9]+", priority = 3)]
    Integer,
    /// Decimal literals with digits on both sides of the point: `3.14`.
    #[regex(r"[+-]?[0-9]+\.[0-9]+", priority = 3)]
    Decimal,
    /// `'c'` or an escape such as `'\n'`, quotes included.
    #[regex(r#"'([^'\n\r\\]|\\[bnrt'"\\])'"#)]
    Character,
    /// `"text"` with escapes, quotes included.
    #[regex(r#""([^"\n\r\\]|\\[bnrt'"\\])*""#, allow_greedy = true)]
    String,
    /// `<=`, `>=`, `==`, `!=`, or any other single visible character.
    #[regex(r"[<>!=]=")]
    #[regex(r#"[^ \x08\n\r\t'"]"#, priority = 1)]
    Operator,
    /// Malformed literals. Never produced: every rule here fails.
    #[token("'", invalid_character)]
    #[regex(r#"'([^'\n\r\\]|\\[bnrt'"\\])"#, mismatched_single_quote)]
    #[regex(r#""([^"\n\r\\]|\\[bnrt'"\\])*"#, unterminated_string, allow_greedy = true)]
    Malformed,
    /// Spaces, backspaces, tabs and line breaks.
    #[regex(r"[ \x08\n\r\t]+", logos::skip)]
    Whitespace,
}

impl TokenKind {
    /// Human readable name used in diagnostics.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Character => "character",
            Self::String => "string",
            Self::Operator => "operator",
            Self::Malformed | Self::Whitespace => "malformed input",
        }
    }
}

/// A token: its kind, the exact source text it covers, and where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What was matched.
    pub kind:    TokenKind,
    /// The matched text, quotes and signs included.
    pub literal: String,
    /// Offset of the first character.
    pub offset:  usize,
}

impl Token {
    /// Creates a token.
    #[must_use]
    pub fn new(kind: TokenKind, literal: impl Into<String>, offset: usize) -> Self {
        Self { kind,
               literal: literal.into(),
               offset }
    }

    /// Offset just past the last character.
    #[must_use]
    pub fn end(&self) -> usize {
        self.offset + self.literal.len()
    }
}

fn invalid_character(_: &mut logos::Lexer<TokenKind>) -> Result<(), LexErrorKind> {
    Err(LexErrorKind::InvalidCharacter)
}

fn mismatched_single_quote(_: &mut logos::Lexer<TokenKind>) -> Result<(), LexErrorKind> {
    Err(LexErrorKind::MismatchedSingleQuote)
}

fn unterminated_string(_: &mut logos::Lexer<TokenKind>) -> Result<(), LexErrorKind> {
    Err(LexErrorKind::UnterminatedString)
}

/// Converts source text into its token sequence.
///
/// Whitespace separates tokens and is dropped. There is no comment syntax.
/// Escape sequences inside character and string literals are validated here
/// but decoded later by the parser.
///
/// # Errors
/// Returns a [`LexError`] for a malformed character literal or an
/// unterminated string. Its offset is where scanning stopped.
///
/// # Example
/// ```
/// use plc::interpreter::lexer::{TokenKind, lex};
///
/// let tokens = lex("LET x = 5;").unwrap();
/// let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
///
/// assert_eq!(kinds,
///            [TokenKind::Identifier,
///             TokenKind::Identifier,
///             TokenKind::Operator,
///             TokenKind::Integer,
///             TokenKind::Operator]);
/// ```
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);

    while let Some(kind) = lexer.next() {
        let span = lexer.span();
        match kind {
            Ok(kind) => tokens.push(Token::new(kind, lexer.slice(), span.start)),
            Err(kind) => {
                return Err(LexError { kind,
                                      offset: span.end });
            },
        }
    }

    log::debug!("lexed {} token(s) from {} byte(s)", tokens.len(), source.len());
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn pairs(source: &str) -> Vec<(TokenKind, String)> {
        lex(source).unwrap()
                   .into_iter()
                   .map(|t| (t.kind, t.literal))
                   .collect()
    }

    #[test]
    fn declaration_tokens() {
        let tokens = lex("LET x = 5;").unwrap();

        assert_eq!(tokens,
                   vec![Token::new(TokenKind::Identifier, "LET", 0),
                        Token::new(TokenKind::Identifier, "x", 4),
                        Token::new(TokenKind::Operator, "=", 6),
                        Token::new(TokenKind::Integer, "5", 8),
                        Token::new(TokenKind::Operator, ";", 9)]);
    }

    #[rstest]
    #[case("getName", TokenKind::Identifier)]
    #[case("_under_score", TokenKind::Identifier)]
    #[case("thing-with-dashes", TokenKind::Identifier)]
    #[case("abc123", TokenKind::Identifier)]
    #[case("1", TokenKind::Integer)]
    #[case("-1", TokenKind::Integer)]
    #[case("+99", TokenKind::Integer)]
    #[case("007", TokenKind::Integer)]
    #[case("1.5", TokenKind::Decimal)]
    #[case("-0.25", TokenKind::Decimal)]
    #[case("'c'", TokenKind::Character)]
    #[case(r"'\n'", TokenKind::Character)]
    #[case(r"'\''", TokenKind::Character)]
    #[case(r#""""#, TokenKind::String)]
    #[case(r#""Hello, World!""#, TokenKind::String)]
    #[case(r#""a\tb\"c\\""#, TokenKind::String)]
    #[case("<=", TokenKind::Operator)]
    #[case("!=", TokenKind::Operator)]
    #[case("(", TokenKind::Operator)]
    #[case("$", TokenKind::Operator)]
    fn single_token(#[case] source: &str, #[case] kind: TokenKind) {
        assert_eq!(pairs(source), vec![(kind, source.to_string())]);
    }

    #[test]
    fn sign_binds_only_to_a_following_digit() {
        assert_eq!(pairs("- 1"),
                   vec![(TokenKind::Operator, "-".into()), (TokenKind::Integer, "1".into())]);
        assert_eq!(pairs("x-1"), vec![(TokenKind::Identifier, "x-1".into())]);
        assert_eq!(pairs("1 -2"),
                   vec![(TokenKind::Integer, "1".into()), (TokenKind::Integer, "-2".into())]);
    }

    #[test]
    fn trailing_point_is_an_operator() {
        assert_eq!(pairs("1."),
                   vec![(TokenKind::Integer, "1".into()), (TokenKind::Operator, ".".into())]);
        assert_eq!(pairs("obj.field"),
                   vec![(TokenKind::Identifier, "obj".into()),
                        (TokenKind::Operator, ".".into()),
                        (TokenKind::Identifier, "field".into())]);
    }

    #[test]
    fn relational_operators_take_two_characters() {
        assert_eq!(pairs("a<=b == c ! d"),
                   vec![(TokenKind::Identifier, "a".into()),
                        (TokenKind::Operator, "<=".into()),
                        (TokenKind::Identifier, "b".into()),
                        (TokenKind::Operator, "==".into()),
                        (TokenKind::Identifier, "c".into()),
                        (TokenKind::Operator, "!".into()),
                        (TokenKind::Identifier, "d".into())]);
    }

    #[test]
    fn whitespace_is_dropped_and_offsets_kept() {
        let tokens = lex(" \t\nDEF\r\n  main").unwrap();

        assert_eq!(tokens,
                   vec![Token::new(TokenKind::Identifier, "DEF", 3),
                        Token::new(TokenKind::Identifier, "main", 10)]);
        assert!(lex(" \u{8}\t\r\n").unwrap().is_empty());
    }

    #[rstest]
    #[case("''", LexErrorKind::InvalidCharacter)]
    #[case("'", LexErrorKind::InvalidCharacter)]
    #[case(r"'\q'", LexErrorKind::InvalidCharacter)]
    #[case("'ab'", LexErrorKind::MismatchedSingleQuote)]
    #[case("'a", LexErrorKind::MismatchedSingleQuote)]
    #[case("\"unterminated", LexErrorKind::UnterminatedString)]
    #[case("\"line\nbreak\"", LexErrorKind::UnterminatedString)]
    #[case(r#""bad \q escape""#, LexErrorKind::UnterminatedString)]
    fn malformed_literals(#[case] source: &str, #[case] kind: LexErrorKind) {
        assert_eq!(lex(source).unwrap_err().kind, kind);
    }

    #[test]
    fn error_offset_points_past_the_scanned_prefix() {
        let error = lex("LET c = 'ab';").unwrap_err();

        assert_eq!(error,
                   LexError { kind:   LexErrorKind::MismatchedSingleQuote,
                              offset: 10, });
    }
}
