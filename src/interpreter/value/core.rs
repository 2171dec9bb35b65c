use std::{cmp::Ordering, rc::Rc};

use num_bigint::BigInt;
use rust_decimal::Decimal;

use crate::{
    ast::Literal,
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::object::Object},
};

/// Represents a runtime value in the interpreter.
///
/// This enum models every value an expression can produce, a variable can
/// hold, or a method can return. Operators dispatch on the variant with
/// exhaustive matches.
#[derive(Debug, Clone)]
pub enum Value {
    /// The absence of a value. Produced by `NIL`, by uninitialized
    /// declarations, and by calls that finish without `RETURN`.
    Nil,
    /// A boolean value (`TRUE` or `FALSE`).
    /// Produced by comparison and logical operators and required as the
    /// condition of `IF` and `WHILE`.
    Boolean(bool),
    /// An arbitrary precision integer.
    Integer(BigInt),
    /// A fixed point decimal that remembers its scale.
    Decimal(Decimal),
    /// A single character.
    Character(char),
    /// A string.
    String(String),
    /// The half-open integer range produced by `range` and consumed by
    /// `FOR`. Its items are produced one at a time.
    Range(IntegerRange),
    /// An embedder-provided object. Cloning shares the object.
    Object(Rc<Object>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Decimal(a), Self::Decimal(b)) => a == b,
            (Self::Character(a), Self::Character(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Range(a), Self::Range(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v.into())
    }
}

impl From<BigInt> for Value {
    fn from(v: BigInt) -> Self {
        Self::Integer(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Self::Decimal(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Self::Character(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<IntegerRange> for Value {
    fn from(v: IntegerRange) -> Self {
        Self::Range(v)
    }
}

impl From<Object> for Value {
    fn from(v: Object) -> Self {
        Self::Object(Rc::new(v))
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Nil => Self::Nil,
            Literal::Boolean(b) => (*b).into(),
            Literal::Integer(i) => i.clone().into(),
            Literal::Decimal(d) => (*d).into(),
            Literal::Character(c) => (*c).into(),
            Literal::String(s) => s.as_str().into(),
        }
    }
}

impl Value {
    /// The name of the value's runtime type, used in diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Nil => "Nil",
            Self::Boolean(_) => "Boolean",
            Self::Integer(_) => "Integer",
            Self::Decimal(_) => "Decimal",
            Self::Character(_) => "Character",
            Self::String(_) => "String",
            Self::Range(_) => "IntegerIterable",
            Self::Object(_) => "Object",
        }
    }

    /// Returns the boolean, or an error if the value is not one.
    ///
    /// # Parameters
    /// - `offset`: Source offset for error reporting.
    ///
    /// # Example
    /// ```
    /// use plc::interpreter::value::core::Value;
    ///
    /// assert!(Value::Boolean(true).as_bool(0).unwrap());
    /// assert!(Value::from(1).as_bool(0).is_err());
    /// ```
    pub fn as_bool(&self, offset: usize) -> EvalResult<bool> {
        match self {
            Self::Boolean(b) => Ok(*b),
            other => Err(other.mismatch("Boolean", offset)),
        }
    }

    /// Returns a fresh cursor over an iterable, or an error if the value is
    /// not one.
    pub fn as_iterable(&self, offset: usize) -> EvalResult<IntegerRange> {
        match self {
            Self::Range(range) => Ok(range.clone()),
            other => Err(other.mismatch("IntegerIterable", offset)),
        }
    }

    /// Returns the object, or an error if the value is not one.
    pub fn as_object(&self, offset: usize) -> EvalResult<Rc<Object>> {
        match self {
            Self::Object(object) => Ok(Rc::clone(object)),
            other => Err(RuntimeError::NotAnObject { found: other.type_name(),
                                                     offset }),
        }
    }

    /// Orders two values of the same comparable variant.
    ///
    /// Integers and decimals compare numerically, characters by code point,
    /// strings lexicographically and booleans with `false < true`.
    ///
    /// # Errors
    /// Returns `RuntimeError::TypeMismatch` when the variants differ or are
    /// not comparable.
    ///
    /// # Example
    /// ```
    /// use std::cmp::Ordering;
    ///
    /// use plc::interpreter::value::core::Value;
    ///
    /// let a = Value::from("apple");
    /// let b = Value::from("banana");
    ///
    /// assert_eq!(a.compare(&b, 0).unwrap(), Ordering::Less);
    /// assert!(a.compare(&Value::from(1), 0).is_err());
    /// ```
    pub fn compare(&self, other: &Self, offset: usize) -> EvalResult<Ordering> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => Ok(a.cmp(b)),
            (Self::Decimal(a), Self::Decimal(b)) => Ok(a.cmp(b)),
            (Self::Character(a), Self::Character(b)) => Ok(a.cmp(b)),
            (Self::String(a), Self::String(b)) => Ok(a.cmp(b)),
            (Self::Boolean(a), Self::Boolean(b)) => Ok(a.cmp(b)),
            (Self::Integer(_)
             | Self::Decimal(_)
             | Self::Character(_)
             | Self::String(_)
             | Self::Boolean(_),
             _) => Err(other.mismatch(self.type_name(), offset)),
            _ => Err(self.mismatch("a comparable value", offset)),
        }
    }

    /// Builds the error for a value of the wrong type.
    pub(crate) fn mismatch(&self, expected: &str, offset: usize) -> RuntimeError {
        RuntimeError::TypeMismatch { expected: expected.to_string(),
                                     found: self.type_name().to_string(),
                                     offset }
    }
}

/// A half-open range of integers, `start` included and `end` excluded.
///
/// The range is its own iterator; clone it to iterate again from the current
/// position.
///
/// # Example
/// ```
/// use plc::interpreter::value::core::IntegerRange;
///
/// let items: Vec<_> = IntegerRange::new((-1).into(), 2.into()).map(|n| n.to_string()).collect();
///
/// assert_eq!(items, ["-1", "0", "1"]);
/// assert_eq!(IntegerRange::new(3.into(), 1.into()).count(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegerRange {
    next: BigInt,
    end:  BigInt,
}

impl IntegerRange {
    /// Creates the range `[start, end)`.
    #[must_use]
    pub const fn new(start: BigInt, end: BigInt) -> Self {
        Self { next: start, end }
    }
}

impl Iterator for IntegerRange {
    type Item = BigInt;

    fn next(&mut self) -> Option<BigInt> {
        if self.next >= self.end {
            return None;
        }
        let current = self.next.clone();
        self.next += 1;
        Some(current)
    }
}

impl std::fmt::Display for IntegerRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.next, self.end)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Character(c) => write!(f, "{c}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Range(range) => write!(f, "{range}"),
            Self::Object(object) => write!(f, "{}", object.type_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn display_matches_print_output() {
        assert_eq!(Value::Nil.to_string(), "nil");
        assert_eq!(Value::Boolean(false).to_string(), "false");
        assert_eq!(Value::from(-12).to_string(), "-12");
        assert_eq!(Value::from(Decimal::from_str("2.50").unwrap()).to_string(), "2.50");
        assert_eq!(Value::from('x').to_string(), "x");
        assert_eq!(Value::from(IntegerRange::new(1.into(), 3.into())).to_string(), "[1, 3)");
    }

    #[test]
    fn ranges_iterate_lazily() {
        let huge = IntegerRange::new(0.into(), BigInt::from(10).pow(30));
        let first: Vec<_> = huge.take(3).collect();

        assert_eq!(first, vec![BigInt::from(0), BigInt::from(1), BigInt::from(2)]);
    }

    #[test]
    fn equality_is_by_value_except_for_objects() {
        assert_eq!(Value::from("a"), Value::from("a"));
        assert_ne!(Value::from(1), Value::from("1"));
        assert_ne!(Value::Nil, Value::Boolean(false));

        let object = Value::from(Object::new("Thing"));
        assert_eq!(object, object.clone());
        assert_ne!(object, Value::from(Object::new("Thing")));
    }

    #[test]
    fn compare_rejects_mixed_variants() {
        let int = Value::from(1);
        let dec = Value::from(Decimal::ONE);

        assert!(matches!(int.compare(&dec, 7),
                         Err(RuntimeError::TypeMismatch { offset: 7, .. })));
        assert!(Value::Nil.compare(&Value::Nil, 0).is_err());
    }
}
