use thiserror::Error;

#[derive(Debug, Error)]
/// Represents all errors that can occur during evaluation and runtime.
pub enum RuntimeError {
    /// Tried to use an undefined variable.
    #[error("Error at offset {offset}: Unknown variable '{name}'.")]
    UnknownVariable {
        /// The name of the variable.
        name:   String,
        /// Offset of the access.
        offset: usize,
    },
    /// Called an unknown function.
    #[error("Error at offset {offset}: Unknown function '{name}' taking {arity} argument(s).")]
    UnknownFunction {
        /// The name of the function.
        name:   String,
        /// The number of arguments supplied.
        arity:  usize,
        /// Offset of the call.
        offset: usize,
    },
    /// Read or wrote a field the object does not have.
    #[error("Error at offset {offset}: Object has no field '{name}'.")]
    UnknownField {
        /// The name of the field.
        name:   String,
        /// Offset of the access.
        offset: usize,
    },
    /// Called a method the object does not have.
    #[error("Error at offset {offset}: Object has no method '{name}' taking {arity} argument(s).")]
    UnknownMethod {
        /// The name of the method.
        name:   String,
        /// The number of arguments supplied.
        arity:  usize,
        /// Offset of the call.
        offset: usize,
    },
    /// Used a field or method on a value that is not an object.
    #[error("Error at offset {offset}: A value of type '{found}' has no fields or methods.")]
    NotAnObject {
        /// The runtime type found.
        found:  &'static str,
        /// Offset of the access.
        offset: usize,
    },
    /// A value had an unexpected or incompatible type.
    #[error("Error at offset {offset}: Expected {expected}, received {found}.")]
    TypeMismatch {
        /// Description of the expected type.
        expected: String,
        /// The runtime type found.
        found:    String,
        /// Offset of the offending expression.
        offset:   usize,
    },
    /// Attempted division by zero.
    #[error("Error at offset {offset}: Division by zero.")]
    DivisionByZero {
        /// Offset of the division.
        offset: usize,
    },
    /// Decimal arithmetic produced a result outside the representable range.
    #[error("Error at offset {offset}: Decimal overflow.")]
    DecimalOverflow {
        /// Offset of the operation.
        offset: usize,
    },
    /// Defined a name twice in the same scope.
    #[error("Error at offset {offset}: '{name}' is already defined in this scope.")]
    Redefinition {
        /// The name.
        name:   String,
        /// Offset of the second definition.
        offset: usize,
    },
    /// The wrong number of arguments was supplied to a built-in.
    #[error("Error at offset {offset}: Expected {expected} argument(s), received {found}.")]
    ArgumentCountMismatch {
        /// Arguments required.
        expected: usize,
        /// Arguments supplied.
        found:    usize,
        /// Offset of the call.
        offset:   usize,
    },
    /// Method calls nested deeper than the interpreter allows.
    #[error("Error at offset {offset}: Call depth limit of {limit} exceeded.")]
    CallDepthExceeded {
        /// The configured limit.
        limit:  usize,
        /// Offset of the call.
        offset: usize,
    },
    /// Writing program output failed.
    #[error("Error: Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
