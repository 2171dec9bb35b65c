use std::str::FromStr;

use num_bigint::BigInt;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;

/// Parses integer literal text, with an optional leading sign, into a
/// [`BigInt`].
///
/// # Returns
/// - `Some(BigInt)`: The parsed value.
/// - `None`: If the text is not an integer literal.
///
/// # Example
/// ```
/// use num_bigint::BigInt;
/// use plc::util::num::parse_integer;
///
/// assert_eq!(parse_integer("+42"), Some(BigInt::from(42)));
/// assert_eq!(parse_integer("-7"), Some(BigInt::from(-7)));
/// assert_eq!(parse_integer("4x"), None);
/// ```
#[must_use]
pub fn parse_integer(text: &str) -> Option<BigInt> {
    BigInt::from_str(text.strip_prefix('+').unwrap_or(text)).ok()
}

/// Parses decimal literal text into a [`Decimal`], keeping the number of
/// fractional digits as its scale.
///
/// # Returns
/// - `Some(Decimal)`: The parsed value.
/// - `None`: If the text is malformed or does not fit a 96 bit mantissa.
///
/// # Example
/// ```
/// use plc::util::num::parse_decimal;
///
/// let d = parse_decimal("-1.50").unwrap();
/// assert_eq!(d.scale(), 2);
/// assert_eq!(d.to_string(), "-1.50");
/// ```
#[must_use]
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str_exact(text.strip_prefix('+').unwrap_or(text)).ok()
}

/// Checks that an integer fits the signed 32 bit range.
///
/// ## Errors
/// Returns `Err(error)` if the value is below `i32::MIN` or above `i32::MAX`.
///
/// ## Example
/// ```
/// use num_bigint::BigInt;
/// use plc::util::num::i32_checked;
///
/// assert_eq!(i32_checked(&BigInt::from(2_147_483_647_i64), "too big"), Ok(i32::MAX));
/// assert!(i32_checked(&BigInt::from(2_147_483_648_i64), "too big").is_err());
/// assert!(i32_checked(&BigInt::from(-2_147_483_649_i64), "too small").is_err());
/// ```
pub fn i32_checked<E>(value: &BigInt, error: E) -> Result<i32, E> {
    value.to_i32().ok_or(error)
}
