use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Represents all errors the analyzer can report.
pub enum TypeError {
    /// A declaration names a type that is not registered.
    #[error("Error at offset {offset}: Unknown type '{name}'.")]
    UnknownType {
        /// The type name.
        name:   String,
        /// Offset of the declaration.
        offset: usize,
    },
    /// A name does not resolve to a variable in scope.
    #[error("Error at offset {offset}: Unknown variable '{name}'.")]
    UnknownVariable {
        /// The variable name.
        name:   String,
        /// Offset of the access.
        offset: usize,
    },
    /// No function with this name and arity is in scope.
    #[error("Error at offset {offset}: Unknown function '{name}' taking {arity} argument(s).")]
    UnknownFunction {
        /// The function name.
        name:   String,
        /// The number of arguments supplied.
        arity:  usize,
        /// Offset of the call.
        offset: usize,
    },
    /// The receiver's type has no field with this name.
    #[error("Error at offset {offset}: Type '{ty}' has no field '{name}'.")]
    UnknownField {
        /// The receiver's type.
        ty:     String,
        /// The field name.
        name:   String,
        /// Offset of the access.
        offset: usize,
    },
    /// The receiver's type has no method with this name and arity.
    #[error("Error at offset {offset}: Type '{ty}' has no method '{name}' taking {arity} argument(s).")]
    UnknownMethod {
        /// The receiver's type.
        ty:     String,
        /// The method name.
        name:   String,
        /// The number of arguments supplied.
        arity:  usize,
        /// Offset of the call.
        offset: usize,
    },
    /// A value of one type is used where another is required.
    #[error("Error at offset {offset}: Type '{actual}' is not assignable to '{target}'.")]
    NotAssignable {
        /// The required type.
        target: String,
        /// The type found.
        actual: String,
        /// Offset of the offending expression.
        offset: usize,
    },
    /// Arithmetic on operands that are not both integers or both decimals.
    #[error("Error at offset {offset}: Operator '{op}' cannot be applied to '{left}' and '{right}'.")]
    InvalidOperands {
        /// The operator.
        op:     String,
        /// Type of the left operand.
        left:   String,
        /// Type of the right operand.
        right:  String,
        /// Offset of the operation.
        offset: usize,
    },
    /// A name is defined twice in the same scope.
    #[error("Error at offset {offset}: '{name}' is already defined in this scope.")]
    Redefinition {
        /// The name.
        name:   String,
        /// Offset of the second definition.
        offset: usize,
    },
    /// An `IF` without statements in its then-branch, or an empty `FOR`.
    #[error("Error at offset {offset}: Block must contain at least one statement.")]
    EmptyBlock {
        /// Offset of the statement.
        offset: usize,
    },
    /// The left side of `=` is not a variable or field access.
    #[error("Error at offset {offset}: Only variables and fields can be assigned.")]
    InvalidAssignmentTarget {
        /// Offset of the assignment.
        offset: usize,
    },
    /// An expression statement that is not a call.
    #[error("Error at offset {offset}: Expression statements must be function calls.")]
    InvalidExpressionStatement {
        /// Offset of the statement.
        offset: usize,
    },
    /// A declaration with neither a type nor an initializer.
    #[error("Error at offset {offset}: Cannot infer the type of '{name}'.")]
    CannotInferType {
        /// The variable name.
        name:   String,
        /// Offset of the declaration.
        offset: usize,
    },
    /// An integer literal outside the signed 32 bit range.
    #[error("Error at offset {offset}: Integer literal {literal} is out of range.")]
    IntegerOutOfRange {
        /// The literal.
        literal: String,
        /// Offset of the literal.
        offset:  usize,
    },
    /// `RETURN` outside of a method body.
    #[error("Error at offset {offset}: Return outside of a method.")]
    ReturnOutsideMethod {
        /// Offset of the statement.
        offset: usize,
    },
    /// No zero-argument `main` returning `Integer` is defined.
    #[error("Error: A method 'main()' returning 'Integer' is required.")]
    MissingMain,
}
