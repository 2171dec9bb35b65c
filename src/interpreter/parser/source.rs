use crate::{
    ast::{Field, Method, Parameter, Source},
    error::ParseError,
    interpreter::{
        lexer::TokenKind,
        parser::{
            core::{ParseResult, parse_block, parse_expression},
            stream::TokenStream,
            utils::{parse_identifier, parse_type_annotation},
        },
    },
};

/// Parses one top level declaration and appends it to `source`.
///
/// # Errors
/// Returns `ParseError::TrailingTokens` if the next token is neither `LET`
/// nor `DEF`.
pub fn parse_member(stream: &mut TokenStream, source: &mut Source) -> ParseResult<()> {
    if stream.accept("LET") {
        source.fields.push(parse_field(stream)?);
    } else if stream.accept("DEF") {
        source.methods.push(parse_method(stream)?);
    } else if let Some(token) = stream.current() {
        return Err(ParseError::TrailingTokens { token:  token.literal.clone(),
                                                offset: token.offset, });
    }
    Ok(())
}

/// Parses a global variable after its `LET` keyword.
///
/// Grammar: `field := 'LET' identifier (':' identifier)? ('=' expr)? ';'?`
fn parse_field(stream: &mut TokenStream) -> ParseResult<Field> {
    let offset = stream.offset();
    let name = parse_identifier(stream)?;
    let type_name = parse_type_annotation(stream)?;
    let value = if stream.accept("=") {
        Some(parse_expression(stream)?)
    } else {
        None
    };
    stream.accept(";");

    Ok(Field { name,
               type_name,
               value,
               variable: None,
               offset })
}

/// Parses a method definition after its `DEF` keyword.
///
/// Every parameter may carry its own type annotation; the return type is
/// optional as well.
///
/// Grammar:
/// ```text
/// method := 'DEF' identifier '(' (parameter (',' parameter)*)? ')'
///           (':' identifier)? 'DO' statement* 'END'
/// parameter := identifier (':' identifier)?
/// ```
///
/// # Errors
/// Returns a `ParseError` for a missing parenthesis, `DO` or `END`, or for a
/// malformed parameter list.
fn parse_method(stream: &mut TokenStream) -> ParseResult<Method> {
    let offset = stream.offset();
    let name = parse_identifier(stream)?;

    stream.expect("(")?;
    let mut parameters = Vec::new();
    if !stream.accept(")") {
        loop {
            let name = stream.expect(TokenKind::Identifier)?.literal.clone();
            let type_name = parse_type_annotation(stream)?;
            parameters.push(Parameter { name, type_name });

            if stream.accept(")") {
                break;
            }
            if !stream.accept(",") {
                return Err(stream.error("',' or ')'"));
            }
        }
    }

    let return_type_name = parse_type_annotation(stream)?;
    stream.expect("DO")?;
    let body = parse_block(stream, &["END"])?;
    stream.expect("END")?;

    Ok(Method { name,
                parameters,
                return_type_name,
                body,
                function: None,
                offset })
}
