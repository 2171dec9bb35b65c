/// Analyzer state and program level checks.
///
/// Defines the `Analyzer`, its global scope, type resolution and the
/// assignability check shared by every rule.
pub mod core;

/// Statement rules.
///
/// Declarations, assignments, blocks and `RETURN`.
pub mod statement;

/// Expression rules.
///
/// Computes and records the static type of every expression and resolves
/// variable and function bindings.
pub mod expression;
