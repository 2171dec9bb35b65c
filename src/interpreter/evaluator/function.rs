use std::io::Write;

use crate::{
    ast::Method,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{BuiltinFn, Callable, EvalResult, Flow, Interpreter, RuntimeScope},
        value::core::{IntegerRange, Value},
    },
};

/// Defines builtin functions by generating a lookup table.
///
/// Each entry provides:
/// - a string name,
/// - the number of arguments,
/// - a function pointer implementing the builtin.
///
/// The macro produces:
/// - `BuiltinDef` (internal metadata),
/// - `BUILTIN_TABLE` (static table used to populate scopes).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        struct BuiltinDef {
            name:  &'static str,
            arity: usize,
            func:  BuiltinFn,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, arity: $arity, func: $func },
            )*
        ];
    };
}

builtin_functions! {
    "print" => { arity: 1, func: print },
    "range" => { arity: 2, func: range },
}

/// Creates a root scope holding every built-in function.
///
/// Embedders add their own globals to the returned scope before handing it
/// to [`Interpreter::with_scope`].
#[must_use]
pub fn global_scope<'a>() -> RuntimeScope<'a> {
    let scope = RuntimeScope::default();
    for builtin in BUILTIN_TABLE {
        scope.define_function(builtin.name, builtin.arity, Callable::Builtin(builtin.func));
    }
    scope
}

/// Ensures a builtin received exactly `expected` arguments.
fn check_arity(args: &[Value], expected: usize, offset: usize) -> EvalResult<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(RuntimeError::ArgumentCountMismatch { expected,
                                                  found: args.len(),
                                                  offset })
    }
}

/// Writes a value's display form and a newline to `out`.
///
/// # Returns
/// `Value::Nil`.
///
/// # Example
/// ```
/// use plc::interpreter::{evaluator::function::print, value::core::Value};
///
/// let mut out = Vec::new();
/// let result = print(&[Value::from("Hi")], &mut out, 0).unwrap();
///
/// assert_eq!(result, Value::Nil);
/// assert_eq!(out, b"Hi\n");
/// ```
pub fn print(args: &[Value], out: &mut dyn Write, offset: usize) -> EvalResult<Value> {
    check_arity(args, 1, offset)?;

    writeln!(out, "{}", args[0])?;
    Ok(Value::Nil)
}

/// Produces the integers from `start` up to, but not including, `end`.
///
/// The items are produced lazily as a `FOR` loop asks for them. An empty
/// iterable results when `end <= start`.
///
/// # Errors
/// Returns `RuntimeError::TypeMismatch` if either bound is not an integer.
///
/// # Example
/// ```
/// use plc::interpreter::{evaluator::function::range, value::core::Value};
///
/// let items = range(&[Value::from(1), Value::from(4)], &mut std::io::sink(), 0).unwrap();
/// let items: Vec<_> = items.as_iterable(0).unwrap().map(Value::from).collect();
///
/// assert_eq!(items, [Value::from(1), Value::from(2), Value::from(3)]);
/// ```
pub fn range(args: &[Value], _: &mut dyn Write, offset: usize) -> EvalResult<Value> {
    check_arity(args, 2, offset)?;

    let (Value::Integer(start), Value::Integer(end)) = (&args[0], &args[1]) else {
        let culprit = if matches!(args[0], Value::Integer(_)) { &args[1] } else { &args[0] };
        return Err(culprit.mismatch("Integer", offset));
    };

    Ok(Value::from(IntegerRange::new(start.clone(), end.clone())))
}

impl<'a> Interpreter<'a> {
    /// Calls the function `name` that takes `arguments.len()` arguments,
    /// resolving it through the current scope chain.
    ///
    /// # Errors
    /// Returns `RuntimeError::UnknownFunction` if nothing matches, otherwise
    /// whatever the call itself fails with.
    pub fn call_function(&mut self,
                         name: &str,
                         arguments: Vec<Value>,
                         offset: usize)
                         -> EvalResult<Value> {
        let callable = self.scope()
                           .lookup_function(name, arguments.len())
                           .ok_or_else(|| RuntimeError::UnknownFunction { name: name.to_string(),
                                                                          arity: arguments.len(),
                                                                          offset })?;

        match callable {
            Callable::Builtin(func) => func(&arguments, self.output(), offset),
            Callable::Method { method, closure } => {
                self.invoke(method, &closure, arguments, offset)
            },
        }
    }

    /// Runs a method body in a fresh child of its defining scope with the
    /// parameters bound positionally.
    ///
    /// # Returns
    /// The value of the `RETURN` that ended the call, or `Value::Nil` if the
    /// body completed without one.
    fn invoke(&mut self,
              method: &'a Method,
              closure: &RuntimeScope<'a>,
              arguments: Vec<Value>,
              offset: usize)
              -> EvalResult<Value> {
        self.enter_call(offset)?;
        log::trace!("calling {}/{}", method.name, arguments.len());

        let flow = self.in_scope(closure.child(), |interpreter| {
                           for (parameter, value) in method.parameters.iter().zip(arguments) {
                               interpreter.define_variable(&parameter.name, value, method.offset)?;
                           }
                           interpreter.execute_block(&method.body)
                       });
        self.leave_call();

        match flow? {
            Flow::Returning(value) => Ok(value),
            Flow::Completed => Ok(Value::Nil),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::interpreter::evaluator::core::{
        MAX_CALL_DEPTH,
        tests::{run, run_main},
    };

    #[test]
    fn global_scope_holds_every_builtin() {
        let scope = global_scope();

        assert!(matches!(scope.lookup_function("print", 1), Some(Callable::Builtin(_))));
        assert!(matches!(scope.lookup_function("range", 2), Some(Callable::Builtin(_))));
        assert!(scope.lookup_function("print", 2).is_none());
    }

    #[rstest]
    #[case(0, 0, vec![])]
    #[case(3, 1, vec![])]
    #[case(-1, 2, vec![-1, 0, 1])]
    fn range_is_half_open(#[case] start: i64, #[case] end: i64, #[case] expected: Vec<i64>) {
        let items = range(&[Value::from(start), Value::from(end)], &mut std::io::sink(), 0).unwrap();

        let items: Vec<_> = items.as_iterable(0).unwrap().map(Value::from).collect();

        assert_eq!(items, expected.into_iter().map(Value::from).collect::<Vec<_>>());
    }

    #[test]
    fn range_rejects_non_integers() {
        assert!(matches!(range(&[Value::from(0), Value::from("3")], &mut std::io::sink(), 9),
                         Err(RuntimeError::TypeMismatch { ref found, offset: 9, .. }) if found == "String"));
    }

    #[test]
    fn print_writes_the_display_form() {
        let mut out = Vec::new();
        print(&[Value::Boolean(true)], &mut out, 0).unwrap();
        print(&[Value::Nil], &mut out, 0).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "true\nnil\n");
    }

    #[test]
    fn methods_bind_parameters_positionally() {
        let (result, output) = run("DEF show(a, b) DO print(a); print(b); END \
                                    DEF main() DO show(\"first\", 2); RETURN 0; END");

        assert_eq!(result.unwrap(), Value::from(0));
        assert_eq!(output, "first\n2\n");
    }

    #[test]
    fn recursion_works() {
        let program = "DEF fact(n) DO IF n <= 1 DO RETURN 1; END RETURN n * fact(n - 1); END \
                       DEF main() DO RETURN fact(20); END";

        assert_eq!(run(program).0.unwrap().to_string(), "2432902008176640000");
    }

    #[test]
    fn closures_see_globals_not_the_callers_locals() {
        let program = "LET x = \"global\"; \
                       DEF show() DO print(x); END \
                       DEF main() DO LET x = \"local\"; show(); RETURN 0; END";

        assert_eq!(run(program).1, "global\n");
    }

    #[test]
    fn methods_are_overloaded_by_arity() {
        let program = "DEF f() DO RETURN 0; END DEF f(a) DO RETURN a; END \
                       DEF main() DO RETURN f() + f(5); END";

        assert_eq!(run(program).0.unwrap(), Value::from(5));
    }

    #[test]
    fn deep_recursion_is_allowed() {
        let program = "DEF sum(n) DO IF n == 0 DO RETURN 0; END RETURN n + sum(n - 1); END \
                       DEF main() DO RETURN sum(5000); END";

        assert_eq!(run(program).0.unwrap(), Value::from(12_502_500));
    }

    #[test]
    fn runaway_recursion_is_stopped() {
        let program = "DEF forever(n) DO RETURN forever(n + 1); END DEF main() DO RETURN forever(0); END";

        assert!(matches!(run(program).0,
                         Err(RuntimeError::CallDepthExceeded { limit: MAX_CALL_DEPTH, .. })));
    }

    #[test]
    fn unknown_functions_report_their_arity() {
        assert!(matches!(run_main("print(1, 2);"),
                         Err(RuntimeError::UnknownFunction { arity: 2, .. })));
    }
}
