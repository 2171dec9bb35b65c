use std::io::Write;

use crate::{
    ast::{Expr, ExprKind, Method, Source},
    error::RuntimeError,
    interpreter::{evaluator::function::global_scope, scope::Scope, value::core::Value},
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// How deeply method calls may nest before evaluation is aborted.
pub const MAX_CALL_DEPTH: usize = 10_000;

/// Remaining stack below which evaluation moves to a freshly allocated
/// segment.
const STACK_RED_ZONE: usize = 128 * 1024;
/// Size of each additional stack segment.
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

/// Signature of a built-in function: the evaluated arguments, the output
/// sink of `print`, and the call's offset for error reporting.
pub type BuiltinFn = fn(&[Value], &mut dyn Write, usize) -> EvalResult<Value>;

/// Something that can be called by name and arity.
#[derive(Clone)]
pub enum Callable<'a> {
    /// A function implemented by the host.
    Builtin(BuiltinFn),
    /// A method of the program, together with the scope it was defined in.
    Method {
        /// The definition.
        method:  &'a Method,
        /// The defining scope. Each call runs in a fresh child of it.
        closure: RuntimeScope<'a>,
    },
}

/// The runtime symbol table: variables hold values, functions callables.
pub type RuntimeScope<'a> = Scope<Value, Callable<'a>>;

/// The outcome of executing a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Control continues with the next statement.
    Completed,
    /// A `RETURN` was executed; the enclosing call yields this value.
    Returning(Value),
}

/// Tree-walking interpreter.
///
/// The interpreter owns the runtime scope chain and the output sink used by
/// `print`. Method closures borrow their definitions from the executed
/// [`Source`], which must therefore outlive the interpreter.
///
/// ## Usage
///
/// `Interpreter::new()` writes to standard output. Use
/// [`Interpreter::with_output`] to capture output, or
/// [`Interpreter::with_scope`] to provide extra globals.
///
/// Executing a program defines its fields and methods in a fresh global frame
/// below the root scope, so the same interpreter can run a program again.
pub struct Interpreter<'a> {
    /// Built-ins and embedder globals.
    root:    RuntimeScope<'a>,
    /// Fields and methods of the program being executed.
    globals: RuntimeScope<'a>,
    /// The innermost scope. Swapped only by `in_scope`.
    scope:   RuntimeScope<'a>,
    out:     Box<dyn Write + 'a>,
    depth:   usize,
}

impl Default for Interpreter<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Interpreter<'_> {
    fn drop(&mut self) {
        // Method closures hold the frame that holds them.
        self.globals.clear();
    }
}

impl<'a> Interpreter<'a> {
    /// Creates an interpreter that prints to standard output.
    #[must_use]
    pub fn new() -> Self {
        Self::with_output(std::io::stdout())
    }

    /// Creates an interpreter that prints to `out`.
    ///
    /// # Example
    /// ```
    /// use plc::interpreter::{evaluator::core::Interpreter, value::core::Value};
    ///
    /// let source = plc::parse_source(&plc::lex("DEF main() DO print(\"Hi\"); RETURN 0; END").unwrap()).unwrap();
    ///
    /// let mut out = Vec::new();
    /// let result = Interpreter::with_output(&mut out).execute(&source).unwrap();
    ///
    /// assert_eq!(result, Value::from(0));
    /// assert_eq!(out, b"Hi\n");
    /// ```
    #[must_use]
    pub fn with_output(out: impl Write + 'a) -> Self {
        Self::with_scope(global_scope(), out)
    }

    /// Creates an interpreter over an embedder-provided root scope.
    ///
    /// The root is not modified by execution; program fields and methods live
    /// in a child of it. Built-ins are only available if the root, or one of
    /// its ancestors, defines them (see [`global_scope`]).
    #[must_use]
    pub fn with_scope(root: RuntimeScope<'a>, out: impl Write + 'a) -> Self {
        let globals = root.child();
        Self { scope: globals.clone(),
               root,
               globals,
               out: Box::new(out),
               depth: 0 }
    }

    /// Runs a program and returns the value of `main()`.
    ///
    /// Fields are defined first, in order, each initializer evaluated in the
    /// global scope. Then every method is defined as a closure over the
    /// global scope, and finally `main` is called without arguments.
    ///
    /// # Errors
    /// Returns the first `RuntimeError`, including
    /// `RuntimeError::UnknownFunction` if there is no `main()`.
    pub fn execute(&mut self, source: &'a Source) -> EvalResult<Value> {
        self.globals.clear();
        self.globals = self.root.child();
        self.scope = self.globals.clone();
        self.depth = 0;

        for field in &source.fields {
            let value = match &field.value {
                Some(value) => self.evaluate(value)?,
                None => Value::Nil,
            };
            self.define_variable(&field.name, value, field.offset)?;
        }

        for method in &source.methods {
            let callable = Callable::Method { method,
                                              closure: self.globals.clone() };
            if !self.globals
                    .define_function(&method.name, method.parameters.len(), callable)
            {
                return Err(RuntimeError::Redefinition { name:   method.name.clone(),
                                                        offset: method.offset, });
            }
        }

        let result = self.call_function("main", Vec::new(), 0)?;
        log::debug!("main returned {result}");
        Ok(result)
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation. Accesses and
    /// calls with a receiver go through the receiver's object; without one
    /// they resolve through the current scope chain.
    ///
    /// # Parameters
    /// - `expr`: Expression to evaluate.
    ///
    /// # Returns
    /// The value the expression produced.
    ///
    /// Deep recursion, through method calls or long operator chains, grows
    /// the stack on demand instead of overflowing it.
    pub fn evaluate(&mut self, expr: &Expr) -> EvalResult<Value> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.evaluate_expr(expr))
    }

    fn evaluate_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        let offset = expr.offset;

        match &expr.kind {
            ExprKind::Literal(literal) => Ok(Value::from(literal)),
            ExprKind::Group(inner) => self.evaluate(inner),
            ExprKind::Binary { op, left, right } => self.evaluate_binary(*op, left, right, offset),
            ExprKind::Access { receiver: Some(receiver),
                               name,
                               .. } => {
                let object = self.evaluate(receiver)?.as_object(receiver.offset)?;
                object.field(name)
                      .ok_or_else(|| RuntimeError::UnknownField { name: name.clone(),
                                                                  offset })
            },
            ExprKind::Access { receiver: None,
                               name,
                               .. } => {
                self.scope
                    .lookup_variable(name)
                    .ok_or_else(|| RuntimeError::UnknownVariable { name: name.clone(),
                                                                   offset })
            },
            ExprKind::Function { receiver: Some(receiver),
                                 name,
                                 arguments,
                                 .. } => {
                let this = self.evaluate(receiver)?;
                let object = this.as_object(receiver.offset)?;

                let mut values = Vec::with_capacity(arguments.len() + 1);
                values.push(this);
                for argument in arguments {
                    values.push(self.evaluate(argument)?);
                }

                let method = object.method(name, values.len()).ok_or_else(|| {
                                 RuntimeError::UnknownMethod { name: name.clone(),
                                                               arity: values.len(),
                                                               offset }
                             })?;
                method(&values)
            },
            ExprKind::Function { receiver: None,
                                 name,
                                 arguments,
                                 .. } => {
                let values = arguments.iter()
                                      .map(|argument| self.evaluate(argument))
                                      .collect::<EvalResult<Vec<_>>>()?;
                self.call_function(name, values, offset)
            },
        }
    }

    /// Runs `run` with `scope` as the current scope, restoring the previous
    /// scope afterwards whether or not `run` succeeded.
    pub(in crate::interpreter::evaluator) fn in_scope<T>(&mut self,
                                                         scope: RuntimeScope<'a>,
                                                         run: impl FnOnce(&mut Self)
                                                             -> EvalResult<T>)
                                                         -> EvalResult<T> {
        let parent = std::mem::replace(&mut self.scope, scope);
        let result = run(self);
        self.scope = parent;
        result
    }

    /// Runs `run` in a fresh child of the current scope.
    pub(in crate::interpreter::evaluator) fn with_child_scope<T>(&mut self,
                                                                 run: impl FnOnce(&mut Self)
                                                                     -> EvalResult<T>)
                                                                 -> EvalResult<T> {
        let child = self.scope.child();
        self.in_scope(child, run)
    }

    /// Defines a variable in the current scope.
    ///
    /// # Errors
    /// Returns `RuntimeError::Redefinition` if the current scope already has
    /// a variable with this name.
    pub(in crate::interpreter::evaluator) fn define_variable(&self,
                                                             name: &str,
                                                             value: Value,
                                                             offset: usize)
                                                             -> EvalResult<()> {
        if self.scope.define_variable(name, value) {
            Ok(())
        } else {
            Err(RuntimeError::Redefinition { name: name.to_string(),
                                             offset })
        }
    }

    /// The innermost scope.
    pub(in crate::interpreter::evaluator) const fn scope(&self) -> &RuntimeScope<'a> {
        &self.scope
    }

    /// The sink `print` writes to.
    pub(in crate::interpreter::evaluator) fn output(&mut self) -> &mut dyn Write {
        &mut *self.out
    }

    /// Enters a method call, failing once [`MAX_CALL_DEPTH`] calls are open.
    pub(in crate::interpreter::evaluator) fn enter_call(&mut self,
                                                        offset: usize)
                                                        -> EvalResult<()> {
        if self.depth >= MAX_CALL_DEPTH {
            return Err(RuntimeError::CallDepthExceeded { limit: MAX_CALL_DEPTH,
                                                         offset });
        }
        self.depth += 1;
        Ok(())
    }

    /// Leaves a method call entered with `enter_call`.
    pub(in crate::interpreter::evaluator) fn leave_call(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

#[cfg(test)]
pub(in crate::interpreter::evaluator) mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::interpreter::{lexer::lex, parser::core::parse_source};

    /// Runs a program without static analysis and returns main's result and
    /// everything it printed.
    pub fn run(program: &str) -> (EvalResult<Value>, String) {
        let source = parse_source(&lex(program).unwrap()).unwrap();
        let mut out = Vec::new();
        let result = Interpreter::with_output(&mut out).execute(&source);
        (result, String::from_utf8(out).unwrap())
    }

    /// Runs `body` inside `main` and returns what `main` returned.
    pub fn run_main(body: &str) -> EvalResult<Value> {
        run(&format!("DEF main() DO {body} END")).0
    }

    #[test]
    fn hello_world() {
        let (result, output) = run("DEF main() : Integer DO print(\"Hi\"); RETURN 0; END");

        assert_eq!(result.unwrap(), Value::from(0));
        assert_eq!(output, "Hi\n");
    }

    #[test]
    fn fields_are_initialized_before_main_runs() {
        let program = "LET greeting = \"Hello\"; LET count : Integer; \
                       DEF main() DO print(greeting); print(count); RETURN 0; END";
        let (result, output) = run(program);

        assert_eq!(result.unwrap(), Value::from(0));
        assert_eq!(output, "Hello\nnil\n");
    }

    #[test]
    fn main_without_return_yields_nil() {
        assert_eq!(run_main("print(1);").unwrap(), Value::Nil);
    }

    #[test]
    fn missing_main_is_a_runtime_error() {
        assert!(matches!(run("DEF start() DO END").0,
                         Err(RuntimeError::UnknownFunction { ref name, arity: 0, .. }) if name == "main"));
    }

    #[test]
    fn unknown_variables_fail() {
        assert!(matches!(run_main("RETURN ghost;"),
                         Err(RuntimeError::UnknownVariable { .. })));
    }

    #[test]
    fn programs_can_run_twice_on_one_interpreter() {
        let source = parse_source(&lex("LET n = 1; DEF main() DO n = n + 1; RETURN n; END").unwrap())
                     .unwrap();
        let mut out = Vec::new();
        let mut interpreter = Interpreter::with_output(&mut out);

        assert_eq!(interpreter.execute(&source).unwrap(), Value::from(2));
        assert_eq!(interpreter.execute(&source).unwrap(), Value::from(2));
    }
    #[test]
    fn in_scope_restores_the_scope_after_an_error() {
        let mut interpreter = Interpreter::with_scope(global_scope(), std::io::sink());
        interpreter.define_variable("x", Value::from(1), 0).unwrap();
        let child = interpreter.scope().child();

        let result: EvalResult<()> = interpreter.in_scope(child, |inner| {
                                                    inner.define_variable("y", Value::from(2), 0)?;
                                                    Err(RuntimeError::DivisionByZero { offset: 3 })
                                                });

        assert!(matches!(result, Err(RuntimeError::DivisionByZero { offset: 3 })));
        assert_eq!(interpreter.scope().lookup_variable("x"), Some(Value::from(1)));
        assert_eq!(interpreter.scope().lookup_variable("y"), None);
    }
}
