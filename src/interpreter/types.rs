use std::{collections::HashMap, fmt, rc::Rc};

/// A static type known to the analyzer.
///
/// The nine built-in types form a fixed, closed set. `Any` and `Comparable`
/// are structural supertypes used only by [`is_assignable`]; no runtime value
/// ever has either of them as its concrete type. Embedders can extend the set
/// with named object types through [`TypeRegistry::register`].
///
/// Two types are equal when their names are equal.
#[derive(Debug, Clone)]
pub enum Type {
    /// Supertype of every type.
    Any,
    /// The type of the `NIL` literal and of methods without a return type.
    Nil,
    /// `TRUE` and `FALSE`.
    Boolean,
    /// Arbitrary precision integers.
    Integer,
    /// Fixed point decimals.
    Decimal,
    /// A single character.
    Character,
    /// A string of characters.
    String,
    /// Supertype of `Integer`, `Decimal`, `Character` and `String`.
    Comparable,
    /// A sequence of integers, consumed by `FOR`.
    IntegerIterable,
    /// An embedder-defined type exposing fields and methods.
    Object(Rc<ObjectType>),
}

impl Type {
    /// Returns the name the type is spelled with in source code.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Any => "Any",
            Self::Nil => "Nil",
            Self::Boolean => "Boolean",
            Self::Integer => "Integer",
            Self::Decimal => "Decimal",
            Self::Character => "Character",
            Self::String => "String",
            Self::Comparable => "Comparable",
            Self::IntegerIterable => "IntegerIterable",
            Self::Object(object) => &object.name,
        }
    }

    /// Looks up a field exposed by this type. Built-in types expose none.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Variable> {
        match self {
            Self::Object(object) => object.fields.get(name),
            _ => None,
        }
    }

    /// Looks up a method by name and arity, where the arity counts the
    /// receiver as parameter 0.
    #[must_use]
    pub fn method(&self, name: &str, arity: usize) -> Option<&Function> {
        match self {
            Self::Object(object) => object.methods.get(&(name.to_string(), arity)),
            _ => None,
        }
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for Type {}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A named type with fields and methods, registered by an embedder.
#[derive(Debug, Clone, Default)]
pub struct ObjectType {
    /// The type name used in declarations.
    pub name:    String,
    /// Field bindings, keyed by field name.
    pub fields:  HashMap<String, Variable>,
    /// Method signatures, keyed by name and arity (receiver included).
    pub methods: HashMap<(String, usize), Function>,
}

impl ObjectType {
    /// Creates an object type without fields or methods.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(),
               ..Self::default() }
    }

    /// Adds a field of the given type.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, ty: Type) -> Self {
        let name = name.into();
        self.fields.insert(name.clone(), Variable { name, ty });
        self
    }

    /// Adds a method. `parameter_types` lists the explicit arguments only;
    /// slot 0 of the stored signature is the receiver and is typed `Any`.
    #[must_use]
    pub fn with_method(mut self,
                       name: impl Into<String>,
                       parameter_types: Vec<Type>,
                       return_type: Type)
                       -> Self {
        let name = name.into();
        let mut parameters = Vec::with_capacity(parameter_types.len() + 1);
        parameters.push(Type::Any);
        parameters.extend(parameter_types);

        let function = Function { name: name.clone(),
                                  parameter_types: parameters,
                                  return_type };
        self.methods.insert((name, function.arity()), function);
        self
    }
}

/// A statically resolved variable binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    /// The variable name.
    pub name: String,
    /// The declared or inferred type.
    pub ty:   Type,
}

/// A statically resolved function signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    /// The function name.
    pub name:            String,
    /// One type per parameter, in order.
    pub parameter_types: Vec<Type>,
    /// The type of a call expression.
    pub return_type:     Type,
}

impl Function {
    /// Creates a signature.
    #[must_use]
    pub fn new(name: impl Into<String>, parameter_types: Vec<Type>, return_type: Type) -> Self {
        Self { name: name.into(),
               parameter_types,
               return_type }
    }

    /// Number of parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.parameter_types.len()
    }
}

/// Resolves type names written in source code.
///
/// A fresh registry knows the nine built-in types. Object types registered
/// later shadow nothing: registering a name twice replaces the earlier type.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: HashMap<String, Type>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates a registry holding the built-in types.
    #[must_use]
    pub fn new() -> Self {
        let types = [Type::Any,
                     Type::Nil,
                     Type::Boolean,
                     Type::Integer,
                     Type::Decimal,
                     Type::Character,
                     Type::String,
                     Type::Comparable,
                     Type::IntegerIterable].into_iter()
                                           .map(|ty| (ty.name().to_string(), ty))
                                           .collect();
        Self { types }
    }

    /// Registers an object type and returns its handle.
    pub fn register(&mut self, object: ObjectType) -> Type {
        let ty = Type::Object(Rc::new(object));
        self.types.insert(ty.name().to_string(), ty.clone());
        ty
    }

    /// Resolves a type by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Type> {
        self.types.get(name).cloned()
    }
}

/// Decides whether a value of type `actual` may be stored where `target` is
/// expected.
///
/// # Example
/// ```
/// use plc::interpreter::types::{Type, is_assignable};
///
/// assert!(is_assignable(&Type::Any, &Type::Boolean));
/// assert!(is_assignable(&Type::Comparable, &Type::String));
/// assert!(!is_assignable(&Type::Comparable, &Type::Boolean));
/// assert!(!is_assignable(&Type::Integer, &Type::Decimal));
/// ```
#[must_use]
pub fn is_assignable(target: &Type, actual: &Type) -> bool {
    match target {
        Type::Any => true,
        Type::Comparable if matches!(actual,
                                     Type::Integer
                                     | Type::Decimal
                                     | Type::Character
                                     | Type::String) => true,
        _ => target == actual,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Type::Any, Type::Nil, true)]
    #[case(Type::Any, Type::IntegerIterable, true)]
    #[case(Type::Comparable, Type::Integer, true)]
    #[case(Type::Comparable, Type::Decimal, true)]
    #[case(Type::Comparable, Type::Character, true)]
    #[case(Type::Comparable, Type::String, true)]
    #[case(Type::Comparable, Type::Comparable, true)]
    #[case(Type::Comparable, Type::Boolean, false)]
    #[case(Type::Comparable, Type::Nil, false)]
    #[case(Type::Integer, Type::Integer, true)]
    #[case(Type::Integer, Type::Decimal, false)]
    #[case(Type::Integer, Type::Any, false)]
    #[case(Type::String, Type::Comparable, false)]
    fn assignability(#[case] target: Type, #[case] actual: Type, #[case] expected: bool) {
        assert_eq!(is_assignable(&target, &actual), expected);
    }

    #[test]
    fn registry_resolves_builtin_and_object_types() {
        let mut registry = TypeRegistry::new();
        assert_eq!(registry.get("Integer"), Some(Type::Integer));
        assert_eq!(registry.get("Point"), None);

        let point = registry.register(ObjectType::new("Point").with_field("x", Type::Integer)
                                                              .with_method("scale",
                                                                           vec![Type::Integer],
                                                                           Type::Nil));

        assert_eq!(registry.get("Point"), Some(point.clone()));
        assert_eq!(point.field("x").map(|v| v.ty.clone()), Some(Type::Integer));
        assert_eq!(point.method("scale", 2).map(Function::arity), Some(2));
        assert!(point.method("scale", 1).is_none());
        assert!(Type::String.field("length").is_none());
    }
}
