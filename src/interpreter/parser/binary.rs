use crate::{
    ast::{BinaryOperator, Expr, ExprKind},
    interpreter::parser::{core::ParseResult, primary::parse_secondary, stream::TokenStream},
};

/// Parses one precedence level.
///
/// The level reads `next` operands separated by any of `operators` and groups
/// the chain to the right: `a - b - c` is `a - (b - c)`. The chain is read in
/// a loop, so its length does not count towards the nesting limit; only
/// groups, argument lists and blocks do.
fn parse_level(stream: &mut TokenStream,
               operators: &[&str],
               next: fn(&mut TokenStream) -> ParseResult<Expr>)
               -> ParseResult<Expr> {
    let mut operands = vec![next(stream)?];
    let mut links = Vec::new();

    while let Some(token) = stream.current()
          && let Some(op) = operators.iter()
                                     .find(|symbol| **symbol == token.literal)
                                     .and_then(|symbol| BinaryOperator::from_symbol(symbol))
    {
        stream.advance();
        links.push((op, token.offset));
        operands.push(next(stream)?);
    }

    let mut right = operands.pop().ok_or_else(|| stream.error("an expression"))?;
    while let Some((op, offset)) = links.pop() {
        let left = operands.pop().ok_or_else(|| stream.error("an expression"))?;
        right = Expr::new(ExprKind::Binary { op,
                                             left:  Box::new(left),
                                             right: Box::new(right), },
                          offset);
    }
    Ok(right)
}

/// Parses `AND` and `OR`, which share the lowest precedence.
///
/// Grammar: `logical := equality (('AND' | 'OR') logical)?`
pub fn parse_logical(stream: &mut TokenStream) -> ParseResult<Expr> {
    parse_level(stream, &["AND", "OR"], parse_equality)
}

/// Parses the relational and equality operators.
///
/// Grammar: `equality := additive (('<' | '<=' | '>' | '>=' | '==' | '!=') equality)?`
pub fn parse_equality(stream: &mut TokenStream) -> ParseResult<Expr> {
    parse_level(stream,
                &["<", "<=", ">", ">=", "==", "!="],
                parse_additive)
}

/// Parses addition and subtraction.
///
/// Grammar: `additive := multiplicative (('+' | '-') additive)?`
pub fn parse_additive(stream: &mut TokenStream) -> ParseResult<Expr> {
    parse_level(stream, &["+", "-"], parse_multiplicative)
}

/// Parses multiplication and division.
///
/// Grammar: `multiplicative := secondary (('*' | '/') multiplicative)?`
pub fn parse_multiplicative(stream: &mut TokenStream) -> ParseResult<Expr> {
    parse_level(stream, &["*", "/"], parse_secondary)
}
