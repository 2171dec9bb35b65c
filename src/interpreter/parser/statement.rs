use crate::{
    ast::{Stmt, StmtKind},
    interpreter::parser::{
        core::{ParseResult, parse_block, parse_expression},
        stream::TokenStream,
        utils::{parse_identifier, parse_type_annotation},
    },
};

/// Parses a single statement.
///
/// A statement may be one of:
/// - a local declaration (`LET`).
/// - an `IF`, `FOR` or `WHILE` block.
/// - a `RETURN`.
/// - an expression, optionally followed by `= value`, terminated by `;`.
///
/// The leading keyword decides; anything else is parsed as an expression and
/// becomes an assignment if the next token is `=`.
///
/// # Parameters
/// - `stream`: Token stream positioned at the statement's first token.
///
/// # Returns
/// The parsed [`Stmt`], tagged with the offset of its first token.
pub fn parse_statement(stream: &mut TokenStream) -> ParseResult<Stmt> {
    let offset = stream.offset();

    let kind = if stream.accept("LET") {
        parse_declaration(stream)?
    } else if stream.accept("IF") {
        parse_if(stream)?
    } else if stream.accept("FOR") {
        parse_for(stream)?
    } else if stream.accept("WHILE") {
        parse_while(stream)?
    } else if stream.accept("RETURN") {
        let value = parse_expression(stream)?;
        stream.expect(";")?;
        StmtKind::Return(value)
    } else {
        let receiver = parse_expression(stream)?;
        let kind = if stream.accept("=") {
            StmtKind::Assignment { receiver,
                                   value: parse_expression(stream)? }
        } else {
            StmtKind::Expression(receiver)
        };
        stream.expect(";")?;
        kind
    };

    Ok(Stmt::new(kind, offset))
}

/// Grammar: `declaration := 'LET' identifier (':' identifier)? ('=' expr)? ';'?`
fn parse_declaration(stream: &mut TokenStream) -> ParseResult<StmtKind> {
    let name = parse_identifier(stream)?;
    let type_name = parse_type_annotation(stream)?;
    let value = if stream.accept("=") {
        Some(parse_expression(stream)?)
    } else {
        None
    };
    stream.accept(";");

    Ok(StmtKind::Declaration { name,
                               type_name,
                               value,
                               variable: None })
}

/// Parses an `IF` statement after its keyword.
///
/// Syntax:
/// ```text
///     IF <condition> DO <statements>
///     ELSE <statements>
///     END
/// ```
/// The `ELSE` branch is optional; both branches may be empty here and are
/// checked by the analyzer.
fn parse_if(stream: &mut TokenStream) -> ParseResult<StmtKind> {
    let condition = parse_expression(stream)?;
    stream.expect("DO")?;

    let then_body = parse_block(stream, &["ELSE", "END"])?;
    let else_body = if stream.accept("ELSE") {
        parse_block(stream, &["END"])?
    } else {
        Vec::new()
    };
    stream.expect("END")?;

    Ok(StmtKind::If { condition,
                      then_body,
                      else_body })
}

/// Grammar: `for := 'FOR' identifier 'IN' expr 'DO' statement* 'END'`
fn parse_for(stream: &mut TokenStream) -> ParseResult<StmtKind> {
    let name = parse_identifier(stream)?;
    stream.expect("IN")?;
    let iterable = parse_expression(stream)?;
    stream.expect("DO")?;
    let body = parse_block(stream, &["END"])?;
    stream.expect("END")?;

    Ok(StmtKind::For { name,
                       iterable,
                       body })
}

/// Grammar: `while := 'WHILE' expr 'DO' statement* 'END'`
fn parse_while(stream: &mut TokenStream) -> ParseResult<StmtKind> {
    let condition = parse_expression(stream)?;
    stream.expect("DO")?;
    let body = parse_block(stream, &["END"])?;
    stream.expect("END")?;

    Ok(StmtKind::While { condition, body })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        ast::{Expr, ExprKind, Literal},
        error::ParseError,
        interpreter::lexer::lex,
    };

    fn statement(source: &str) -> ParseResult<Stmt> {
        let tokens = lex(source).unwrap();
        let mut stream = TokenStream::new(&tokens);
        let stmt = parse_statement(&mut stream)?;
        assert!(stream.is_empty(), "unconsumed tokens in {source:?}");
        Ok(stmt)
    }

    fn access(name: &str, offset: usize) -> Expr {
        Expr::new(ExprKind::Access { receiver: None,
                                     name:     name.to_string(),
                                     variable: None, },
                  offset)
    }

    #[test]
    fn assignment_is_detected_after_the_receiver() {
        assert_eq!(statement("x = 1;").unwrap(),
                   Stmt::new(StmtKind::Assignment { receiver: access("x", 0),
                                                    value:    Expr::new(ExprKind::Literal(Literal::from(1)),
                                                                        4), },
                             0));
    }

    #[test]
    fn expression_statement_needs_a_semicolon() {
        assert!(matches!(statement("print(1)").unwrap_err(),
                         ParseError::UnexpectedEndOfInput { .. }));
        assert!(matches!(statement("print(1);").unwrap().kind, StmtKind::Expression(_)));
    }

    #[test]
    fn declaration_semicolon_is_optional() {
        let StmtKind::Declaration { name, type_name, value, .. } =
            statement("LET total : Decimal").unwrap().kind
        else {
            panic!("expected a declaration");
        };

        assert_eq!((name.as_str(), type_name.as_deref(), value), ("total", Some("Decimal"), None));
    }

    #[test]
    fn if_with_else_branch() {
        let StmtKind::If { then_body, else_body, .. } =
            statement("IF TRUE DO a = 1; b = 2; ELSE c = 3; END").unwrap().kind
        else {
            panic!("expected an if statement");
        };

        assert_eq!(then_body.len(), 2);
        assert_eq!(else_body.len(), 1);
    }

    #[test]
    fn while_consumes_its_end() {
        let StmtKind::While { body, .. } = statement("WHILE x < 10 DO x = x + 1; END").unwrap().kind
        else {
            panic!("expected a while loop");
        };

        assert_eq!(body.len(), 1);
    }

    #[test]
    fn for_loop_parts() {
        let StmtKind::For { name, iterable, body } =
            statement("FOR i IN range(0, 3) DO print(i); END").unwrap().kind
        else {
            panic!("expected a for loop");
        };

        assert_eq!(name, "i");
        assert!(matches!(iterable.kind, ExprKind::Function { ref name, .. } if name == "range"));
        assert_eq!(body.len(), 1);
    }

    #[test]
    fn return_requires_a_value_and_semicolon() {
        assert!(statement("RETURN;").is_err());
        assert!(statement("RETURN 1").is_err());
    }

    #[test]
    fn missing_keywords_are_reported_with_their_offset() {
        assert_eq!(statement("FOR i range(0, 1) DO END").unwrap_err(),
                   ParseError::Expected { expected: "'IN'".to_string(),
                                          found:    "range".to_string(),
                                          offset:   6, });
    }
}
