use crate::{
    ast::{Expr, Source, Stmt},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            binary::parse_logical, source::parse_member, statement::parse_statement,
            stream::TokenStream,
        },
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// How many expressions and blocks may be open at once. Deeper input is
/// rejected instead of overflowing the host stack.
pub const MAX_PARSE_DEPTH: usize = 64;

/// Parses a complete program.
///
/// Every token must belong to a field or a method; parsing stops at the
/// first error.
///
/// Grammar: `source := (field | method)*`
///
/// # Parameters
/// - `tokens`: The output of the lexer.
///
/// # Returns
/// The program's fields and methods in source order.
///
/// # Errors
/// Returns a `ParseError` for the first structural violation, including a
/// top level token that starts neither `LET` nor `DEF`.
///
/// # Example
/// ```
/// use plc::interpreter::{lexer::lex, parser::core::parse_source};
///
/// let tokens = lex("LET limit = 3; DEF main() : Integer DO RETURN limit; END").unwrap();
/// let source = parse_source(&tokens).unwrap();
///
/// assert_eq!(source.fields.len(), 1);
/// assert_eq!(source.methods[0].name, "main");
/// ```
pub fn parse_source(tokens: &[Token]) -> ParseResult<Source> {
    let mut stream = TokenStream::new(tokens);
    let mut source = Source::default();

    while !stream.is_empty() {
        parse_member(&mut stream, &mut source)?;
    }

    log::debug!("parsed {} field(s) and {} method(s)",
                source.fields.len(),
                source.methods.len());
    Ok(source)
}

/// Parses a full expression.
///
/// This is the entry point for expression parsing. It begins at the lowest
/// precedence level, `AND`/`OR`, and descends through the levels below.
///
/// Grammar: `expr := logical`
pub fn parse_expression(stream: &mut TokenStream) -> ParseResult<Expr> {
    stream.nested(parse_logical)
}

/// Parses statements up to, but not including, one of `terminators`.
///
/// The terminator itself is left for the caller to consume, so `IF` can stop
/// at either `ELSE` or `END`.
///
/// # Errors
/// Propagates statement errors. Running out of tokens before a terminator is
/// reported by the caller's `expect`.
pub fn parse_block(stream: &mut TokenStream, terminators: &[&str]) -> ParseResult<Vec<Stmt>> {
    stream.nested(|stream| {
              let mut statements = Vec::new();

              while !stream.is_empty() && !terminators.iter().any(|t| stream.peek(*t)) {
                  statements.push(parse_statement(stream)?);
              }

              Ok(statements)
          })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        ast::{ExprKind, Literal, Method, StmtKind},
        interpreter::lexer::lex,
    };

    fn parse(source: &str) -> ParseResult<Source> {
        parse_source(&lex(source).unwrap())
    }

    #[test]
    fn minimal_main() {
        let source = parse("DEF main ( ) DO RETURN 0 ; END").unwrap();
        let ret = Stmt::new(StmtKind::Return(Expr::new(ExprKind::Literal(Literal::from(0)), 23)),
                            16);

        assert_eq!(source.fields, vec![]);
        assert_eq!(source.methods,
                   vec![Method { name:             "main".to_string(),
                                 parameters:       vec![],
                                 return_type_name: None,
                                 body:             vec![ret],
                                 function:         None,
                                 offset:           4, }]);
    }

    #[test]
    fn empty_program_is_valid() {
        assert_eq!(parse("").unwrap(), Source::default());
    }

    #[test]
    fn top_level_tokens_must_start_a_member() {
        assert_eq!(parse("DEF main() DO END 5").unwrap_err(),
                   ParseError::TrailingTokens { token:  "5".to_string(),
                                                offset: 18, });
    }

    #[test]
    fn unclosed_method_reports_end_of_input() {
        assert!(matches!(parse("DEF main() DO RETURN 0;").unwrap_err(),
                         ParseError::UnexpectedEndOfInput { offset: 23, .. }));
    }

    #[test]
    fn deep_nesting_is_rejected() {
        let depth = MAX_PARSE_DEPTH * 2;
        let program = format!("LET x = {}1{};", "(".repeat(depth), ")".repeat(depth));

        assert!(matches!(parse(&program).unwrap_err(), ParseError::NestingTooDeep { .. }));
    }
}
