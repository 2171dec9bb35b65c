use crate::{
    ast::{Expr, ExprKind, Literal},
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            core::{ParseResult, parse_expression},
            stream::TokenStream,
            utils::{parse_arguments, parse_identifier},
        },
    },
    util::{
        escape::unquote,
        num::{parse_decimal, parse_integer},
    },
};

/// Parses a primary expression followed by any number of `.name` field
/// accesses or `.name(args)` method calls.
///
/// Each step wraps the expression so far as the receiver of the next one,
/// so `a.b.c()` calls `c` on the field `b` of `a`.
///
/// Grammar: `secondary := primary ('.' identifier ('(' arguments)?)*`
pub fn parse_secondary(stream: &mut TokenStream) -> ParseResult<Expr> {
    let mut expr = parse_primary(stream)?;

    while stream.accept(".") {
        let offset = stream.offset();
        let name = parse_identifier(stream)?;
        let receiver = Some(Box::new(expr));

        let kind = if stream.accept("(") {
            ExprKind::Function { receiver,
                                 name,
                                 arguments: parse_arguments(stream)?,
                                 function: None }
        } else {
            ExprKind::Access { receiver,
                               name,
                               variable: None }
        };
        expr = Expr::new(kind, offset);
    }

    Ok(expr)
}

/// Parses a primary expression.
///
/// Primary expressions are literals, parenthesized groups, variable
/// accesses and calls without a receiver.
///
/// Grammar:
/// ```text
/// primary := 'TRUE' | 'FALSE' | 'NIL' | integer | decimal | character | string
///          | '(' expr ')'
///          | identifier ('(' arguments)?
/// ```
///
/// # Errors
/// Returns `ParseError::InvalidExpression` for a token that cannot start an
/// expression and `ParseError::LiteralOutOfRange` for a decimal literal that
/// does not fit its runtime representation.
pub fn parse_primary(stream: &mut TokenStream) -> ParseResult<Expr> {
    let Some(token) = stream.current() else {
        return Err(stream.error("an expression"));
    };
    let offset = token.offset;

    let kind = if stream.accept("TRUE") {
        ExprKind::Literal(Literal::Boolean(true))
    } else if stream.accept("FALSE") {
        ExprKind::Literal(Literal::Boolean(false))
    } else if stream.accept("NIL") {
        ExprKind::Literal(Literal::Nil)
    } else if stream.accept("(") {
        let inner = parse_expression(stream)?;
        stream.expect(")")?;
        ExprKind::Group(Box::new(inner))
    } else if stream.peek_sequence(&[&TokenKind::Identifier, &"("]) {
        stream.advance();
        stream.advance();
        ExprKind::Function { receiver:  None,
                             name:      token.literal.clone(),
                             arguments: parse_arguments(stream)?,
                             function:  None, }
    } else if stream.accept(TokenKind::Identifier) {
        ExprKind::Access { receiver: None,
                           name:     token.literal.clone(),
                           variable: None, }
    } else {
        let literal = parse_literal(token)?;
        stream.advance();
        ExprKind::Literal(literal)
    };

    Ok(Expr::new(kind, offset))
}

/// Converts a literal token into its value.
///
/// Quoted literals lose their quotes and have their escapes decoded.
fn parse_literal(token: &Token) -> ParseResult<Literal> {
    let out_of_range = || ParseError::LiteralOutOfRange { literal: token.literal.clone(),
                                                          offset:  token.offset, };

    match token.kind {
        TokenKind::Integer => parse_integer(&token.literal).map(Literal::Integer)
                                                           .ok_or_else(out_of_range),
        TokenKind::Decimal => parse_decimal(&token.literal).map(Literal::Decimal)
                                                           .ok_or_else(out_of_range),
        TokenKind::Character => {
            let text = unquote(&token.literal);
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Literal::Character(c)),
                _ => Err(invalid(token)),
            }
        },
        TokenKind::String => Ok(Literal::String(unquote(&token.literal))),
        _ => Err(invalid(token)),
    }
}

fn invalid(token: &Token) -> ParseError {
    ParseError::InvalidExpression { token:  token.literal.clone(),
                                    offset: token.offset, }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::interpreter::lexer::lex;

    fn expression(source: &str) -> ParseResult<Expr> {
        let tokens = lex(source).unwrap();
        let mut stream = TokenStream::new(&tokens);
        parse_secondary(&mut stream)
    }

    fn literal(source: &str) -> Literal {
        match expression(source).unwrap().kind {
            ExprKind::Literal(literal) => literal,
            other => panic!("expected a literal, found {other:?}"),
        }
    }

    #[rstest]
    #[case("TRUE", Literal::Boolean(true))]
    #[case("FALSE", Literal::Boolean(false))]
    #[case("NIL", Literal::Nil)]
    #[case("-42", Literal::from(-42))]
    #[case("'a'", Literal::Character('a'))]
    #[case(r"'\t'", Literal::Character('\t'))]
    #[case(r#""line\nbreak""#, Literal::from("line\nbreak"))]
    #[case(r#""\"quoted\"""#, Literal::from("\"quoted\""))]
    fn literals(#[case] source: &str, #[case] expected: Literal) {
        assert_eq!(literal(source), expected);
    }

    #[test]
    fn decimals_keep_their_scale() {
        let Literal::Decimal(d) = literal("2.50") else {
            panic!("expected a decimal");
        };
        assert_eq!(d.to_string(), "2.50");
    }

    #[test]
    fn huge_integers_parse_and_huge_decimals_do_not() {
        assert!(matches!(literal("99999999999999999999"), Literal::Integer(_)));
        assert!(matches!(expression("99999999999999999999999999999999.5").unwrap_err(),
                         ParseError::LiteralOutOfRange { offset: 0, .. }));
    }

    #[test]
    fn calls_and_accesses() {
        let ExprKind::Function { receiver, name, arguments, .. } =
            expression("max(1, x)").unwrap().kind
        else {
            panic!("expected a call");
        };
        assert!(receiver.is_none());
        assert_eq!(name, "max");
        assert_eq!(arguments.len(), 2);

        assert!(matches!(expression("value").unwrap().kind,
                         ExprKind::Access { receiver: None, ref name, .. } if name == "value"));
    }

    #[test]
    fn receiver_chains_nest_to_the_left() {
        let expr = expression("a.b.c(1)").unwrap();
        let ExprKind::Function { receiver: Some(receiver), name, arguments, .. } = expr.kind else {
            panic!("expected a method call");
        };

        assert_eq!((name.as_str(), arguments.len(), expr.offset), ("c", 1, 4));
        assert!(matches!(receiver.kind,
                         ExprKind::Access { receiver: Some(_), ref name, .. } if name == "b"));
    }

    #[test]
    fn groups_need_closing_parenthesis() {
        assert!(matches!(expression("(1").unwrap_err(),
                         ParseError::UnexpectedEndOfInput { .. }));
        assert!(matches!(expression("(1)").unwrap().kind, ExprKind::Group(_)));
    }

    #[rstest]
    #[case(")")]
    #[case(";")]
    #[case("*")]
    fn tokens_that_cannot_start_an_expression(#[case] source: &str) {
        assert_eq!(expression(source).unwrap_err(),
                   ParseError::InvalidExpression { token:  source.to_string(),
                                                   offset: 0, });
    }
}
