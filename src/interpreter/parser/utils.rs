use crate::{
    ast::Expr,
    interpreter::{
        lexer::TokenKind,
        parser::{
            core::{ParseResult, parse_expression},
            stream::TokenStream,
        },
    },
};

/// Parses a plain identifier and returns its name.
///
/// Keywords are identifiers too; callers that must exclude them check first.
pub(in crate::interpreter::parser) fn parse_identifier(stream: &mut TokenStream)
                                                       -> ParseResult<String> {
    Ok(stream.expect(TokenKind::Identifier)?.literal.clone())
}

/// Parses an optional `: TypeName` annotation.
///
/// # Returns
/// - `Some(name)` if a `:` was present.
/// - `None` otherwise, without consuming anything.
pub(in crate::interpreter::parser) fn parse_type_annotation(stream: &mut TokenStream)
                                                            -> ParseResult<Option<String>> {
    if stream.accept(":") {
        Ok(Some(parse_identifier(stream)?))
    } else {
        Ok(None)
    }
}

/// Parses a call's argument list after its opening parenthesis, consuming
/// the closing one.
///
/// An immediately encountered `)` produces an empty list.
///
/// Grammar: `arguments := (expr (',' expr)*)? ')'`
///
/// # Errors
/// Returns a `ParseError` if an argument fails to parse or is followed by
/// anything other than `,` or `)`.
pub(in crate::interpreter::parser) fn parse_arguments(stream: &mut TokenStream)
                                                      -> ParseResult<Vec<Expr>> {
    let mut arguments = Vec::new();
    if stream.accept(")") {
        return Ok(arguments);
    }
    loop {
        arguments.push(parse_expression(stream)?);
        if stream.accept(")") {
            break;
        }
        if !stream.accept(",") {
            return Err(stream.error("',' or ')'"));
        }
    }
    Ok(arguments)
}
