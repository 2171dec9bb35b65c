use crate::{
    ast::{Expr, Field, Method, Source},
    error::TypeError,
    interpreter::{
        scope::Scope,
        types::{Function, Type, TypeRegistry, Variable, is_assignable},
    },
};

/// Result type used by the analyzer.
pub type AnalyzeResult<T> = Result<T, TypeError>;

/// The static symbol table: variables carry their type, functions their
/// signature.
pub type StaticScope = Scope<Variable, Function>;

/// Creates a global scope holding the built-in signatures
/// `print(Any) : Nil` and `range(Integer, Integer) : IntegerIterable`.
///
/// Embedders add their own globals to the returned scope before handing it
/// to [`Analyzer::with_scope`].
#[must_use]
pub fn global_scope() -> StaticScope {
    let scope = StaticScope::default();
    scope.define_function("print", 1, Function::new("print", vec![Type::Any], Type::Nil));
    scope.define_function("range",
                          2,
                          Function::new("range",
                                        vec![Type::Integer, Type::Integer],
                                        Type::IntegerIterable));
    scope
}

/// Static type checker.
///
/// The analyzer walks a [`Source`] once, resolving every name against a
/// chain of scopes, recording the static type of each expression and the
/// binding of each access and call. It stops at the first violation.
///
/// ## Usage
///
/// `Analyzer::new()` starts from [`global_scope`] and the built-in types.
/// Embedders that expose extra globals or object types use
/// [`Analyzer::with_scope`].
pub struct Analyzer {
    /// The innermost scope. Swapped only by `with_child_scope`.
    pub(in crate::interpreter::analyzer) scope:       StaticScope,
    /// Resolves type names.
    pub(in crate::interpreter::analyzer) registry:    TypeRegistry,
    /// The declared return type of the method being checked.
    pub(in crate::interpreter::analyzer) return_type: Option<Type>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    /// Creates an analyzer with the built-in globals and types.
    #[must_use]
    pub fn new() -> Self {
        Self::with_scope(global_scope(), TypeRegistry::new())
    }

    /// Creates an analyzer over an embedder-provided global scope and type
    /// registry.
    #[must_use]
    pub fn with_scope(scope: StaticScope, registry: TypeRegistry) -> Self {
        Self { scope,
               registry,
               return_type: None }
    }

    /// Checks a whole program and annotates it in place.
    ///
    /// The program's globals live in a child of the analyzer's scope, so the
    /// same analyzer may check several programs.
    ///
    /// Fields are checked in order first. Then every method signature is
    /// registered in the program's global scope, so that methods may call each other
    /// regardless of order, and finally each body is checked.
    ///
    /// # Errors
    /// - The first `TypeError` found in a field or method.
    /// - `TypeError::Redefinition` if two fields share a name or two methods
    ///   share a name and arity.
    /// - `TypeError::MissingMain` if no `main()` returning `Integer` exists.
    ///
    /// # Example
    /// ```
    /// use plc::interpreter::{analyzer::core::Analyzer, lexer::lex, parser::core::parse_source};
    ///
    /// let tokens = lex("DEF main() : Integer DO RETURN 0; END").unwrap();
    /// let mut source = parse_source(&tokens).unwrap();
    ///
    /// assert!(Analyzer::new().analyze(&mut source).is_ok());
    /// assert!(source.methods[0].function.is_some());
    /// ```
    pub fn analyze(&mut self, source: &mut Source) -> AnalyzeResult<()> {
        self.with_child_scope(|analyzer| {
                for field in &mut source.fields {
                    analyzer.analyze_field(field)?;
                }

                for method in &mut source.methods {
                    analyzer.declare_method(method)?;
                }

                match analyzer.scope.lookup_function("main", 0) {
                    Some(main) if main.return_type == Type::Integer => {},
                    _ => return Err(TypeError::MissingMain),
                }

                for method in &mut source.methods {
                    analyzer.analyze_method(method)?;
                }
                Ok(())
            })?;

        log::debug!("analyzed {} field(s) and {} method(s)",
                    source.fields.len(),
                    source.methods.len());
        Ok(())
    }

    fn analyze_field(&mut self, field: &mut Field) -> AnalyzeResult<()> {
        let ty = self.declared_type(field.type_name.as_deref(), field.value.as_mut(), field.offset)?
                     .unwrap_or(Type::Any);

        field.variable = Some(self.define_variable(&field.name, ty, field.offset)?);
        Ok(())
    }

    /// Resolves a method's signature and defines it in the current scope.
    fn declare_method(&mut self, method: &mut Method) -> AnalyzeResult<()> {
        let mut parameter_types = Vec::with_capacity(method.parameters.len());
        for parameter in &method.parameters {
            parameter_types.push(self.resolve_optional(parameter.type_name.as_deref(),
                                                       Type::Any,
                                                       method.offset)?);
        }
        let return_type =
            self.resolve_optional(method.return_type_name.as_deref(), Type::Nil, method.offset)?;

        let function = Function::new(&method.name, parameter_types, return_type);
        if !self.scope
                .define_function(&method.name, function.arity(), function.clone())
        {
            return Err(TypeError::Redefinition { name:   method.name.clone(),
                                                 offset: method.offset, });
        }

        method.function = Some(function);
        Ok(())
    }

    fn analyze_method(&mut self, method: &mut Method) -> AnalyzeResult<()> {
        let Some(function) = method.function.clone() else {
            return Err(TypeError::UnknownFunction { name:   method.name.clone(),
                                                    arity:  method.parameters.len(),
                                                    offset: method.offset, });
        };
        log::trace!("analyzing method {}/{}", method.name, function.arity());

        let previous = self.return_type.replace(function.return_type.clone());
        let result = self.with_child_scope(|analyzer| {
                             for (parameter, ty) in
                                 method.parameters.iter().zip(&function.parameter_types)
                             {
                                 analyzer.define_variable(&parameter.name, ty.clone(), method.offset)?;
                             }
                             analyzer.analyze_statements(&mut method.body)
                         });
        self.return_type = previous;
        result
    }

    /// Runs `analyze` in a fresh child of the current scope and restores the
    /// current scope afterwards, whether or not `analyze` succeeded.
    pub(in crate::interpreter::analyzer) fn with_child_scope<T>(&mut self,
                                                                analyze: impl FnOnce(&mut Self)
                                                                    -> AnalyzeResult<T>)
                                                                -> AnalyzeResult<T> {
        let child = self.scope.child();
        let parent = std::mem::replace(&mut self.scope, child);
        let result = analyze(self);
        self.scope = parent;
        result
    }

    /// Defines a variable in the current scope.
    ///
    /// # Errors
    /// Returns `TypeError::Redefinition` if the current scope already has it.
    pub(in crate::interpreter::analyzer) fn define_variable(&self,
                                                            name: &str,
                                                            ty: Type,
                                                            offset: usize)
                                                            -> AnalyzeResult<Variable> {
        let variable = Variable { name: name.to_string(),
                                  ty };
        if self.scope.define_variable(name, variable.clone()) {
            Ok(variable)
        } else {
            Err(TypeError::Redefinition { name: name.to_string(),
                                          offset })
        }
    }

    /// Computes the type of a `LET`.
    ///
    /// # Returns
    /// - The declared type, after checking that the value fits it.
    /// - The value's type if no type is declared.
    /// - `None` if there is neither.
    pub(in crate::interpreter::analyzer) fn declared_type(&mut self,
                                                          type_name: Option<&str>,
                                                          value: Option<&mut Expr>,
                                                          offset: usize)
                                                          -> AnalyzeResult<Option<Type>> {
        let actual = match value {
            Some(value) => Some(self.analyze_expression(value)?),
            None => None,
        };

        match (type_name, actual) {
            (Some(name), actual) => {
                let target = self.resolve_type(name, offset)?;
                if let Some(actual) = actual {
                    require_assignable(&target, &actual, offset)?;
                }
                Ok(Some(target))
            },
            (None, actual) => Ok(actual),
        }
    }

    /// Resolves a type name through the registry.
    pub(in crate::interpreter::analyzer) fn resolve_type(&self,
                                                         name: &str,
                                                         offset: usize)
                                                         -> AnalyzeResult<Type> {
        self.registry
            .get(name)
            .ok_or_else(|| TypeError::UnknownType { name: name.to_string(),
                                                    offset })
    }

    fn resolve_optional(&self,
                        name: Option<&str>,
                        default: Type,
                        offset: usize)
                        -> AnalyzeResult<Type> {
        name.map_or(Ok(default), |name| self.resolve_type(name, offset))
    }
}

/// Fails unless a value of type `actual` may be used where `target` is
/// required.
///
/// # Errors
/// Returns `TypeError::NotAssignable`.
pub fn require_assignable(target: &Type, actual: &Type, offset: usize) -> AnalyzeResult<()> {
    if is_assignable(target, actual) {
        Ok(())
    } else {
        Err(TypeError::NotAssignable { target: target.to_string(),
                                       actual: actual.to_string(),
                                       offset })
    }
}

#[cfg(test)]
pub(in crate::interpreter::analyzer) mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::interpreter::{lexer::lex, parser::core::parse_source};

    pub fn analyze(program: &str) -> AnalyzeResult<Source> {
        let mut source = parse_source(&lex(program).unwrap()).unwrap();
        Analyzer::new().analyze(&mut source)?;
        Ok(source)
    }

    pub fn analyze_main(body: &str) -> AnalyzeResult<Source> {
        analyze(&format!("DEF main() : Integer DO {body} RETURN 0; END"))
    }

    #[test]
    fn main_is_required() {
        assert_eq!(analyze("").unwrap_err(), TypeError::MissingMain);
        assert_eq!(analyze("DEF main() DO END").unwrap_err(), TypeError::MissingMain);
        assert_eq!(analyze("DEF main(x) : Integer DO RETURN 0; END").unwrap_err(),
                   TypeError::MissingMain);
        assert!(analyze("DEF main() : Integer DO RETURN 0; END").is_ok());
    }

    #[test]
    fn field_value_must_match_declared_type() {
        assert_eq!(analyze("LET x : Integer = \"hello\";").unwrap_err(),
                   TypeError::NotAssignable { target: "Integer".to_string(),
                                              actual: "String".to_string(),
                                              offset: 4, });
    }

    #[test]
    fn fields_infer_their_type_or_default_to_any() {
        let source = analyze("LET a = 1.5; LET b; LET c : Comparable = 'c'; \
                              DEF main() : Integer DO RETURN 0; END").unwrap();
        let types: Vec<_> = source.fields
                                  .iter()
                                  .map(|f| f.variable.as_ref().map(|v| v.ty.to_string()))
                                  .collect();

        assert_eq!(types,
                   vec![Some("Decimal".to_string()),
                        Some("Any".to_string()),
                        Some("Comparable".to_string())]);
    }

    #[test]
    fn unknown_type_names_are_rejected() {
        assert!(matches!(analyze("LET p : Point; DEF main() : Integer DO RETURN 0; END"),
                         Err(TypeError::UnknownType { ref name, .. }) if name == "Point"));
    }

    #[test]
    fn methods_may_call_each_other_in_any_order() {
        let program = "DEF main() : Integer DO RETURN twice(21); END \
                       DEF twice(n : Integer) : Integer DO RETURN n + n; END";

        let source = analyze(program).unwrap();
        assert_eq!(source.methods[1].function,
                   Some(Function::new("twice", vec![Type::Integer], Type::Integer)));
    }

    #[test]
    fn same_name_and_arity_cannot_be_defined_twice() {
        let program = "DEF f() DO END DEF f(x) DO END DEF f() DO END \
                       DEF main() : Integer DO RETURN 0; END";

        assert!(matches!(analyze(program),
                         Err(TypeError::Redefinition { ref name, offset: 35 }) if name == "f"));
    }

    #[test]
    fn embedders_can_provide_globals() {
        let scope = global_scope();
        scope.define_variable("limit",
                              Variable { name: "limit".to_string(),
                                         ty:   Type::Integer, });

        let mut source =
            parse_source(&lex("DEF main() : Integer DO RETURN limit; END").unwrap()).unwrap();

        assert!(Analyzer::new().analyze(&mut source.clone()).is_err());
        assert!(Analyzer::with_scope(scope, TypeRegistry::new()).analyze(&mut source)
                                                                .is_ok());
    }
    #[test]
    fn one_analyzer_checks_several_programs() {
        let scope = global_scope();
        let mut analyzer = Analyzer::with_scope(scope.clone(), TypeRegistry::new());
        let program = "LET total : Integer = 1; DEF main() : Integer DO RETURN total; END";

        for _ in 0..2 {
            let mut source = parse_source(&lex(program).unwrap()).unwrap();
            assert_eq!(analyzer.analyze(&mut source), Ok(()));
        }
        assert!(scope.lookup_variable("total").is_none());
        assert!(scope.lookup_function("main", 0).is_none());
    }
}
