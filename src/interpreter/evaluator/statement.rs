use crate::{
    ast::{Expr, ExprKind, Stmt, StmtKind},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Flow, Interpreter},
        value::core::Value,
    },
};

impl Interpreter<'_> {
    /// Executes statements in order, in the current scope.
    ///
    /// Stops at the first statement that returns, passing the value on.
    pub fn execute_block(&mut self, statements: &[Stmt]) -> EvalResult<Flow> {
        for statement in statements {
            if let Flow::Returning(value) = self.execute_statement(statement)? {
                return Ok(Flow::Returning(value));
            }
        }
        Ok(Flow::Completed)
    }

    /// Executes a single statement.
    ///
    /// `IF` runs one branch in a fresh child scope. `FOR` and `WHILE` run each
    /// iteration in its own fresh child scope. A `RETURN` anywhere inside
    /// makes the whole statement return.
    ///
    /// # Errors
    /// Returns a `RuntimeError` if a condition is not a boolean, a `FOR`
    /// operand is not iterable, an assignment target is unknown, or any
    /// expression fails.
    pub fn execute_statement(&mut self, statement: &Stmt) -> EvalResult<Flow> {
        let offset = statement.offset;

        match &statement.kind {
            StmtKind::Expression(expr) => {
                self.evaluate(expr)?;
            },
            StmtKind::Declaration { name, value, .. } => {
                let value = match value {
                    Some(value) => self.evaluate(value)?,
                    None => Value::Nil,
                };
                self.define_variable(name, value, offset)?;
            },
            StmtKind::Assignment { receiver, value } => self.assign(receiver, value, offset)?,
            StmtKind::If { condition,
                           then_body,
                           else_body, } => {
                let branch = if self.evaluate(condition)?.as_bool(condition.offset)? {
                    then_body
                } else {
                    else_body
                };
                return self.with_child_scope(|interpreter| interpreter.execute_block(branch));
            },
            StmtKind::For { name, iterable, body } => {
                let items = self.evaluate(iterable)?.as_iterable(iterable.offset)?;
                for item in items {
                    let flow = self.with_child_scope(|interpreter| {
                                       interpreter.define_variable(name, Value::Integer(item), offset)?;
                                       interpreter.execute_block(body)
                                   })?;
                    if let Flow::Returning(_) = flow {
                        return Ok(flow);
                    }
                }
            },
            StmtKind::While { condition, body } => {
                while self.evaluate(condition)?.as_bool(condition.offset)? {
                    let flow =
                        self.with_child_scope(|interpreter| interpreter.execute_block(body))?;
                    if let Flow::Returning(_) = flow {
                        return Ok(flow);
                    }
                }
            },
            StmtKind::Return(value) => return Ok(Flow::Returning(self.evaluate(value)?)),
        }

        Ok(Flow::Completed)
    }

    /// Stores `value` into a variable or an object field.
    fn assign(&mut self, receiver: &Expr, value: &Expr, offset: usize) -> EvalResult<()> {
        match &receiver.kind {
            ExprKind::Access { receiver: Some(object),
                               name,
                               .. } => {
                let object = self.evaluate(object)?.as_object(object.offset)?;
                let value = self.evaluate(value)?;
                if object.set_field(name, value) {
                    Ok(())
                } else {
                    Err(RuntimeError::UnknownField { name: name.clone(),
                                                     offset: receiver.offset })
                }
            },
            ExprKind::Access { receiver: None,
                               name,
                               .. } => {
                let value = self.evaluate(value)?;
                if self.scope().assign_variable(name, value) {
                    Ok(())
                } else {
                    Err(RuntimeError::UnknownVariable { name: name.clone(),
                                                        offset: receiver.offset })
                }
            },
            _ => Err(RuntimeError::TypeMismatch { expected: "a variable or field".to_string(),
                                                  found: "an expression".to_string(),
                                                  offset }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::interpreter::{
        evaluator::{
            core::tests::{run, run_main},
            function::global_scope,
        },
        lexer::lex,
        parser::core::parse_source,
        value::object::Object,
    };

    #[test]
    fn if_runs_exactly_one_branch() {
        let (_, output) = run("DEF main() DO \
                               IF 1 < 2 DO print(\"then\"); ELSE print(\"else\"); END \
                               IF 1 > 2 DO print(\"then\"); ELSE print(\"else\"); END \
                               END");
        assert_eq!(output, "then\nelse\n");
    }

    #[test]
    fn variables_declared_in_if_vanish_after_it() {
        let result = run_main("IF TRUE DO LET x = 1; END RETURN x;");

        assert!(matches!(result,
                         Err(RuntimeError::UnknownVariable { ref name, .. }) if name == "x"));
    }

    #[test]
    fn assignment_reaches_the_declaring_scope() {
        assert_eq!(run_main("LET x = 1; IF TRUE DO x = 2; END RETURN x;").unwrap(),
                   Value::from(2));
    }

    #[test]
    fn while_loops_until_the_condition_fails() {
        let (result, output) = run("DEF main() DO \
                                    LET i = 0; \
                                    WHILE i < 3 DO print(i); i = i + 1; END \
                                    RETURN i; END");

        assert_eq!(result.unwrap(), Value::from(3));
        assert_eq!(output, "0\n1\n2\n");
    }

    #[test]
    fn loop_bodies_get_a_fresh_scope_per_iteration() {
        assert_eq!(run_main("LET i = 0; \
                             WHILE i < 2 DO LET seen = i; i = i + 1; END \
                             FOR j IN range(0, 2) DO LET seen = j; END \
                             RETURN i;")
                   .unwrap(),
                   Value::from(2));
    }

    #[test]
    fn for_iterates_a_range() {
        let (result, output) = run("DEF main() DO \
                                    LET sum = 0; \
                                    FOR i IN range(1, 4) DO sum = sum + i; END \
                                    print(sum); RETURN 0; END");

        assert_eq!(result.unwrap(), Value::from(0));
        assert_eq!(output, "6\n");
    }

    #[test]
    fn for_over_a_huge_range_can_return_early() {
        let result = run_main("FOR i IN range(0, 1000000000000000000000) DO RETURN i; END RETURN -1;");

        assert_eq!(result.unwrap(), Value::from(0));
    }

    #[test]
    fn return_unwinds_nested_blocks() {
        let (result, output) = run("DEF main() DO \
                                    FOR i IN range(0, 10) DO \
                                    IF i == 2 DO RETURN i; END \
                                    print(i); END \
                                    RETURN -1; END");

        assert_eq!(result.unwrap(), Value::from(2));
        assert_eq!(output, "0\n1\n");
    }

    #[test]
    fn conditions_must_be_boolean_at_run_time() {
        assert!(matches!(run_main("IF 1 DO END"),
                         Err(RuntimeError::TypeMismatch { ref expected, .. }) if expected == "Boolean"));
        assert!(matches!(run_main("FOR i IN 3 DO END"),
                         Err(RuntimeError::TypeMismatch { .. })));
    }

    #[test]
    fn redeclaring_in_the_same_scope_fails() {
        assert!(matches!(run_main("LET x = 1; LET x = 2;"),
                         Err(RuntimeError::Redefinition { .. })));
    }

    #[test]
    fn object_fields_can_be_assigned() {
        let root = global_scope();
        let point = Value::from(Object::new("Point").with_field("x", Value::from(1)));
        root.define_variable("p", point.clone());

        let source = parse_source(&lex("DEF main() DO p.x = p.x + 41; p.y = 0; END").unwrap())
                     .unwrap();
        let mut out = Vec::new();
        let result = Interpreter::with_scope(root, &mut out).execute(&source);

        assert!(matches!(result, Err(RuntimeError::UnknownField { ref name, .. }) if name == "y"));
        let object: Rc<Object> = point.as_object(0).unwrap();
        assert_eq!(object.field("x"), Some(Value::from(42)));
    }
}
