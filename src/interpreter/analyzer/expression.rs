use crate::{
    ast::{BinaryOperator, Expr, ExprKind, Literal},
    error::TypeError,
    interpreter::{
        analyzer::core::{AnalyzeResult, Analyzer, require_assignable},
        types::Type,
    },
    util::num::i32_checked,
};

/// Remaining stack below which analysis moves to a fresh segment.
const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROW_SIZE: usize = 1024 * 1024;

impl Analyzer {
    /// Computes the static type of an expression.
    ///
    /// The type is recorded on the expression, and accesses and calls get
    /// their resolved binding, so the interpreter and other tools can read
    /// them later.
    ///
    /// # Errors
    /// Returns a `TypeError` for unresolvable names, arguments or operands of
    /// the wrong type, and out-of-range literals.
    pub fn analyze_expression(&mut self, expr: &mut Expr) -> AnalyzeResult<Type> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.analyze_expr(expr))
    }

    fn analyze_expr(&mut self, expr: &mut Expr) -> AnalyzeResult<Type> {
        let offset = expr.offset;

        let ty = match &mut expr.kind {
            ExprKind::Literal(literal) => literal_type(literal, offset)?,
            ExprKind::Group(inner) => self.analyze_expression(inner)?,
            ExprKind::Binary { op, left, right } => {
                let left = self.analyze_expression(left)?;
                let right = self.analyze_expression(right)?;
                binary_type(*op, &left, &right, offset)?
            },
            ExprKind::Access { receiver,
                               name,
                               variable, } => {
                let resolved = match receiver {
                    Some(receiver) => {
                        let ty = self.analyze_expression(receiver)?;
                        ty.field(name)
                          .cloned()
                          .ok_or_else(|| TypeError::UnknownField { ty: ty.to_string(),
                                                                   name: name.clone(),
                                                                   offset })?
                    },
                    None => self.scope
                                .lookup_variable(name)
                                .ok_or_else(|| TypeError::UnknownVariable { name: name.clone(),
                                                                            offset })?,
                };
                let ty = resolved.ty.clone();
                *variable = Some(resolved);
                ty
            },
            ExprKind::Function { receiver,
                                 name,
                                 arguments,
                                 function, } => {
                let resolved = match receiver {
                    Some(receiver) => {
                        let ty = self.analyze_expression(receiver)?;
                        let arity = arguments.len() + 1;
                        let method = ty.method(name, arity).cloned().ok_or_else(|| {
                                         TypeError::UnknownMethod { ty: ty.to_string(),
                                                                    name: name.clone(),
                                                                    arity,
                                                                    offset }
                                     })?;
                        self.check_arguments(arguments, method.parameter_types.get(1..))?;
                        method
                    },
                    None => {
                        let arity = arguments.len();
                        let found = self.scope.lookup_function(name, arity).ok_or_else(|| {
                                        TypeError::UnknownFunction { name: name.clone(),
                                                                     arity,
                                                                     offset }
                                    })?;
                        self.check_arguments(arguments, Some(found.parameter_types.as_slice()))?;
                        found
                    },
                };
                let ty = resolved.return_type.clone();
                *function = Some(resolved);
                ty
            },
        };

        expr.ty = Some(ty.clone());
        Ok(ty)
    }

    /// Checks each argument against the parameter type at the same position.
    fn check_arguments(&mut self,
                       arguments: &mut [Expr],
                       parameters: Option<&[Type]>)
                       -> AnalyzeResult<()> {
        let parameters = parameters.unwrap_or_default();

        for (argument, parameter) in arguments.iter_mut().zip(parameters) {
            let actual = self.analyze_expression(argument)?;
            require_assignable(parameter, &actual, argument.offset)?;
        }
        Ok(())
    }
}

/// The type of a literal, after checking that integers fit 32 bits.
fn literal_type(literal: &Literal, offset: usize) -> AnalyzeResult<Type> {
    let ty = match literal {
        Literal::Nil => Type::Nil,
        Literal::Boolean(_) => Type::Boolean,
        Literal::Integer(value) => {
            i32_checked(value,
                        TypeError::IntegerOutOfRange { literal: value.to_string(),
                                                       offset })?;
            Type::Integer
        },
        // The parser already rejects decimals without a `Decimal` form.
        Literal::Decimal(_) => Type::Decimal,
        Literal::Character(_) => Type::Character,
        Literal::String(_) => Type::String,
    };
    Ok(ty)
}

/// The type of a binary expression given its operand types.
///
/// - `AND`/`OR` take and produce `Boolean`.
/// - Comparisons take two operands of the same comparable type and produce
///   `Boolean`.
/// - `+` produces `String` when either side is a `String`.
/// - Otherwise arithmetic needs two `Integer`s or two `Decimal`s and produces
///   the same type.
fn binary_type(op: BinaryOperator, left: &Type, right: &Type, offset: usize) -> AnalyzeResult<Type> {
    let invalid = || TypeError::InvalidOperands { op: op.to_string(),
                                                  left: left.to_string(),
                                                  right: right.to_string(),
                                                  offset };

    if op.is_logical() {
        require_assignable(&Type::Boolean, left, offset)?;
        require_assignable(&Type::Boolean, right, offset)?;
        return Ok(Type::Boolean);
    }

    if op.is_comparison() {
        require_assignable(&Type::Comparable, left, offset)?;
        require_assignable(&Type::Comparable, right, offset)?;
        if left != right {
            return Err(invalid());
        }
        return Ok(Type::Boolean);
    }

    if op == BinaryOperator::Add && (*left == Type::String || *right == Type::String) {
        return Ok(Type::String);
    }

    match left {
        Type::Integer | Type::Decimal if left == right => Ok(left.clone()),
        _ => Err(invalid()),
    }
}
