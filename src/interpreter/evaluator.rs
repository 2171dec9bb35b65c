/// Core evaluation logic and interpreter state.
///
/// Contains the `Interpreter`, program execution, expression evaluation and
/// the scope handling shared by statements and calls.
pub mod core;

/// Statement execution.
///
/// Runs statements and blocks, reporting whether control completed normally
/// or is returning from the enclosing method.
pub mod statement;

/// Binary operator evaluation.
///
/// Implements short-circuit logic, comparisons, string concatenation and
/// integer and decimal arithmetic.
pub mod binary;

/// Function evaluation.
///
/// Handles built-in and user-defined calls, argument binding, and the
/// built-in function table.
pub mod function;
