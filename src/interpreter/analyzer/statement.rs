use crate::{
    ast::{Expr, ExprKind, Stmt, StmtKind},
    error::TypeError,
    interpreter::{
        analyzer::core::{AnalyzeResult, Analyzer, require_assignable},
        types::Type,
    },
};

impl Analyzer {
    /// Checks statements in order, in the current scope.
    pub fn analyze_statements(&mut self, statements: &mut [Stmt]) -> AnalyzeResult<()> {
        statements.iter_mut()
                  .try_for_each(|statement| self.analyze_statement(statement))
    }

    /// Checks a single statement.
    ///
    /// Blocks (`IF`, `FOR`, `WHILE`) are checked in fresh child scopes that are
    /// discarded afterwards, so names they declare are not visible after the
    /// statement.
    ///
    /// # Errors
    /// - `TypeError::InvalidExpressionStatement` for an expression statement
    ///   that is not a call.
    /// - `TypeError::InvalidAssignmentTarget` when assigning to anything but
    ///   a variable or field.
    /// - `TypeError::EmptyBlock` for an `IF` without a then-branch or an empty
    ///   `FOR`.
    /// - `TypeError::ReturnOutsideMethod` for a `RETURN` outside a method.
    /// - Any error from the expressions involved.
    pub fn analyze_statement(&mut self, statement: &mut Stmt) -> AnalyzeResult<()> {
        let offset = statement.offset;

        match &mut statement.kind {
            StmtKind::Expression(expr) => {
                if !matches!(expr.kind, ExprKind::Function { .. }) {
                    return Err(TypeError::InvalidExpressionStatement { offset });
                }
                self.analyze_expression(expr)?;
            },
            StmtKind::Declaration { name,
                                    type_name,
                                    value,
                                    variable, } => {
                let ty = self.declared_type(type_name.as_deref(), value.as_mut(), offset)?
                             .ok_or_else(|| TypeError::CannotInferType { name: name.clone(),
                                                                         offset })?;
                *variable = Some(self.define_variable(name, ty, offset)?);
            },
            StmtKind::Assignment { receiver, value } => {
                if !matches!(receiver.kind, ExprKind::Access { .. }) {
                    return Err(TypeError::InvalidAssignmentTarget { offset });
                }
                let target = self.analyze_expression(receiver)?;
                let actual = self.analyze_expression(value)?;
                require_assignable(&target, &actual, value.offset)?;
            },
            StmtKind::If { condition,
                           then_body,
                           else_body, } => {
                self.require_condition(condition)?;
                if then_body.is_empty() {
                    return Err(TypeError::EmptyBlock { offset });
                }
                self.with_child_scope(|analyzer| analyzer.analyze_statements(then_body))?;
                self.with_child_scope(|analyzer| analyzer.analyze_statements(else_body))?;
            },
            StmtKind::For { name, iterable, body } => {
                let ty = self.analyze_expression(iterable)?;
                require_assignable(&Type::IntegerIterable, &ty, iterable.offset)?;
                if body.is_empty() {
                    return Err(TypeError::EmptyBlock { offset });
                }
                self.with_child_scope(|analyzer| {
                        analyzer.define_variable(name, Type::Integer, offset)?;
                        analyzer.analyze_statements(body)
                    })?;
            },
            StmtKind::While { condition, body } => {
                self.require_condition(condition)?;
                self.with_child_scope(|analyzer| analyzer.analyze_statements(body))?;
            },
            StmtKind::Return(value) => {
                let Some(expected) = self.return_type.clone() else {
                    return Err(TypeError::ReturnOutsideMethod { offset });
                };
                let actual = self.analyze_expression(value)?;
                require_assignable(&expected, &actual, value.offset)?;
            },
        }

        Ok(())
    }

    fn require_condition(&mut self, condition: &mut Expr) -> AnalyzeResult<()> {
        let ty = self.analyze_expression(condition)?;
        require_assignable(&Type::Boolean, &ty, condition.offset)
    }
}
