/// Object values.
///
/// Defines the `Object` type backing `Value::Object`: a mutable field map
/// shared by every handle to the object, plus a table of native methods keyed
/// by name and arity.
pub mod object;

pub mod core;
