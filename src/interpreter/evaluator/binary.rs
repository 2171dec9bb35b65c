use std::cmp::Ordering;

use num_traits::Zero;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    ast::{BinaryOperator, Expr},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::core::Value,
    },
};

impl Interpreter<'_> {
    /// Evaluates a binary expression.
    ///
    /// `AND` and `OR` evaluate their right operand only when the left one
    /// does not decide the result. Every other operator evaluates both
    /// operands, left first, and hands them to [`apply`].
    pub fn evaluate_binary(&mut self,
                           op: BinaryOperator,
                           left: &Expr,
                           right: &Expr,
                           offset: usize)
                           -> EvalResult<Value> {
        if op.is_logical() {
            let lhs = self.evaluate(left)?.as_bool(left.offset)?;
            let decided = match op {
                BinaryOperator::And => !lhs,
                _ => lhs,
            };
            if decided {
                return Ok(Value::Boolean(lhs));
            }
            let rhs = self.evaluate(right)?.as_bool(right.offset)?;
            return Ok(Value::Boolean(rhs));
        }

        let lhs = self.evaluate(left)?;
        let rhs = self.evaluate(right)?;
        apply(op, &lhs, &rhs, offset)
    }
}

/// Applies a non-logical binary operator to two values.
///
/// - `==` and `!=` compare by value.
/// - The relational operators order two values of the same comparable type.
/// - `+` concatenates display forms when either side is a string.
/// - Arithmetic needs two integers or two decimals. Integer division
///   truncates toward zero; decimal division keeps the dividend's scale,
///   rounding half to even.
///
/// # Errors
/// - `RuntimeError::TypeMismatch` for operands of the wrong types.
/// - `RuntimeError::DivisionByZero` if the divisor is zero.
/// - `RuntimeError::DecimalOverflow` if a decimal result is out of range.
///
/// # Example
/// ```
/// use plc::{
///     ast::BinaryOperator,
///     interpreter::{evaluator::binary::apply, value::core::Value},
/// };
///
/// let result = apply(BinaryOperator::Div, &Value::from(7), &Value::from(2), 0).unwrap();
/// assert_eq!(result, Value::from(3));
///
/// let text = apply(BinaryOperator::Add, &Value::from("n = "), &Value::from(1), 0).unwrap();
/// assert_eq!(text, Value::from("n = 1"));
/// ```
pub fn apply(op: BinaryOperator, left: &Value, right: &Value, offset: usize) -> EvalResult<Value> {
    use BinaryOperator::{
        Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mul, NotEqual, Or, Sub,
    };

    match op {
        Equal => Ok(Value::Boolean(left == right)),
        NotEqual => Ok(Value::Boolean(left != right)),
        Less | LessEqual | Greater | GreaterEqual => {
            let ordering = left.compare(right, offset)?;
            Ok(Value::Boolean(match op {
                                  Less => ordering == Ordering::Less,
                                  LessEqual => ordering != Ordering::Greater,
                                  Greater => ordering == Ordering::Greater,
                                  _ => ordering != Ordering::Less,
                              }))
        },
        Add if matches!(left, Value::String(_)) || matches!(right, Value::String(_)) => {
            Ok(Value::String(format!("{left}{right}")))
        },
        Add | Sub | Mul | Div => arithmetic(op, left, right, offset),
        And | Or => Err(RuntimeError::TypeMismatch { expected: "an arithmetic operator".to_string(),
                                                     found:    op.to_string(),
                                                     offset }),
    }
}

/// Integer or decimal arithmetic on two operands of the same type.
fn arithmetic(op: BinaryOperator, left: &Value, right: &Value, offset: usize) -> EvalResult<Value> {
    use BinaryOperator::{Add, Mul, Sub};

    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => {
            let result = match op {
                Add => a + b,
                Sub => a - b,
                Mul => a * b,
                _ => {
                    if b.is_zero() {
                        return Err(RuntimeError::DivisionByZero { offset });
                    }
                    a / b
                },
            };
            Ok(Value::Integer(result))
        },
        (Value::Decimal(a), Value::Decimal(b)) => {
            let result = match op {
                Add => a.checked_add(*b),
                Sub => a.checked_sub(*b),
                Mul => a.checked_mul(*b),
                _ => return divide_decimal(*a, *b, offset).map(Value::Decimal),
            };
            result.map(Value::Decimal)
                  .ok_or(RuntimeError::DecimalOverflow { offset })
        },
        (Value::Integer(_) | Value::Decimal(_), other) => {
            Err(other.mismatch(left.type_name(), offset))
        },
        (other, _) => Err(other.mismatch("Integer or Decimal", offset)),
    }
}

/// Divides keeping the dividend's scale, rounding half to even.
fn divide_decimal(dividend: Decimal, divisor: Decimal, offset: usize) -> EvalResult<Decimal> {
    if divisor.is_zero() {
        return Err(RuntimeError::DivisionByZero { offset });
    }

    let scale = dividend.scale();
    let mut quotient = dividend.checked_div(divisor)
                               .ok_or(RuntimeError::DecimalOverflow { offset })?
                               .round_dp_with_strategy(scale, RoundingStrategy::MidpointNearestEven);
    quotient.rescale(scale);
    Ok(quotient)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::interpreter::evaluator::core::tests::{run, run_main};

    fn dec(text: &str) -> Value {
        Value::from(Decimal::from_str(text).unwrap())
    }

    #[rstest]
    #[case(BinaryOperator::Add, 7, 2, 9)]
    #[case(BinaryOperator::Sub, 7, 9, -2)]
    #[case(BinaryOperator::Mul, -7, 3, -21)]
    #[case(BinaryOperator::Div, 7, 2, 3)]
    #[case(BinaryOperator::Div, -7, 2, -3)]
    fn integer_arithmetic(#[case] op: BinaryOperator,
                          #[case] left: i64,
                          #[case] right: i64,
                          #[case] expected: i64) {
        assert_eq!(apply(op, &Value::from(left), &Value::from(right), 0).unwrap(),
                   Value::from(expected));
    }

    #[rstest]
    #[case(BinaryOperator::Add, "1.5", "2.25", "3.75")]
    #[case(BinaryOperator::Sub, "1.0", "2.5", "-1.5")]
    #[case(BinaryOperator::Mul, "1.5", "2.0", "3.00")]
    #[case(BinaryOperator::Div, "1.5", "2.0", "0.8")]
    #[case(BinaryOperator::Div, "2.5", "2", "1.2")]
    #[case(BinaryOperator::Div, "4.0", "2.0", "2.0")]
    #[case(BinaryOperator::Div, "10.00", "3", "3.33")]
    fn decimal_arithmetic(#[case] op: BinaryOperator,
                          #[case] left: &str,
                          #[case] right: &str,
                          #[case] expected: &str) {
        let result = apply(op, &dec(left), &dec(right), 0).unwrap();

        assert_eq!(result.to_string(), expected);
    }

    #[test]
    fn division_by_zero_fails() {
        assert!(matches!(apply(BinaryOperator::Div, &Value::from(10), &Value::from(0), 3),
                         Err(RuntimeError::DivisionByZero { offset: 3 })));
        assert!(matches!(apply(BinaryOperator::Div, &dec("1.0"), &dec("0.00"), 4),
                         Err(RuntimeError::DivisionByZero { offset: 4 })));
    }

    #[test]
    fn decimal_overflow_is_reported() {
        let max = Value::from(Decimal::MAX);

        assert!(matches!(apply(BinaryOperator::Mul, &max, &dec("2"), 0),
                         Err(RuntimeError::DecimalOverflow { .. })));
    }

    #[test]
    fn integers_do_not_overflow() {
        let big = apply(BinaryOperator::Mul,
                        &Value::from(i64::MAX),
                        &Value::from(i64::MAX),
                        0).unwrap();

        assert_eq!(big.to_string(), "85070591730234615847396907784232501249");
    }

    #[rstest]
    #[case(Value::from("a"), Value::from("b"), "ab")]
    #[case(Value::from("n"), Value::from(1), "n1")]
    #[case(Value::from(1), Value::from("n"), "1n")]
    #[case(Value::from("is "), Value::Boolean(true), "is true")]
    #[case(Value::from("c"), Value::Character('d'), "cd")]
    #[case(Value::from("x"), Value::Nil, "xnil")]
    fn plus_concatenates_strings(#[case] left: Value, #[case] right: Value, #[case] expected: &str) {
        assert_eq!(apply(BinaryOperator::Add, &left, &right, 0).unwrap(), Value::from(expected));
    }

    #[rstest]
    #[case(BinaryOperator::Less, 1, 2, true)]
    #[case(BinaryOperator::LessEqual, 2, 2, true)]
    #[case(BinaryOperator::Greater, 1, 2, false)]
    #[case(BinaryOperator::GreaterEqual, 2, 3, false)]
    #[case(BinaryOperator::Equal, 2, 2, true)]
    #[case(BinaryOperator::NotEqual, 2, 2, false)]
    fn comparisons(#[case] op: BinaryOperator,
                   #[case] left: i64,
                   #[case] right: i64,
                   #[case] expected: bool) {
        assert_eq!(apply(op, &Value::from(left), &Value::from(right), 0).unwrap(),
                   Value::Boolean(expected));
    }

    #[test]
    fn equality_across_types_is_false() {
        assert_eq!(apply(BinaryOperator::Equal, &Value::from(1), &dec("1"), 0).unwrap(),
                   Value::Boolean(false));
        assert_eq!(apply(BinaryOperator::Equal, &Value::Nil, &Value::Nil, 0).unwrap(),
                   Value::Boolean(true));
    }

    #[rstest]
    #[case(BinaryOperator::Add, Value::from(1), dec("1.0"))]
    #[case(BinaryOperator::Sub, Value::from("a"), Value::from("b"))]
    #[case(BinaryOperator::Mul, Value::Boolean(true), Value::from(2))]
    #[case(BinaryOperator::Less, Value::from(1), Value::from("2"))]
    fn mismatched_operands_fail(#[case] op: BinaryOperator,
                                #[case] left: Value,
                                #[case] right: Value) {
        assert!(matches!(apply(op, &left, &right, 0), Err(RuntimeError::TypeMismatch { .. })));
    }

    #[test]
    fn logical_operators_short_circuit() {
        assert_eq!(run_main("RETURN FALSE AND missing();").unwrap(), Value::Boolean(false));
        assert_eq!(run_main("RETURN TRUE OR missing();").unwrap(), Value::Boolean(true));
        assert!(matches!(run_main("RETURN TRUE AND missing();"),
                         Err(RuntimeError::UnknownFunction { .. })));
    }

    #[test]
    fn logical_operands_must_be_boolean() {
        assert!(matches!(run_main("RETURN 1 OR TRUE;"),
                         Err(RuntimeError::TypeMismatch { ref expected, .. }) if expected == "Boolean"));
    }

    #[test]
    fn operands_evaluate_left_to_right() {
        let program = "DEF say(text) DO print(text); RETURN 1; END \
                       DEF main() DO RETURN say(\"left\") + say(\"right\"); END";
        let (result, output) = run(program);

        assert_eq!(result.unwrap(), Value::from(2));
        assert_eq!(output, "left\nright\n");
    }
}
