use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

struct Frame<V, F> {
    parent:    Option<Scope<V, F>>,
    variables: HashMap<String, V>,
    functions: HashMap<(String, usize), F>,
}

/// A chained symbol table.
///
/// Each scope holds variables keyed by name and functions keyed by name and
/// arity, plus an optional parent. Lookups walk from the scope towards the
/// root, so a name defined in a child shadows the same name in an ancestor.
///
/// `Scope` is a shared handle: cloning it yields another handle to the same
/// frame. The analyzer instantiates it with static bindings, the evaluator
/// with runtime values and callables, and method closures keep a handle to
/// the scope they were defined in.
pub struct Scope<V, F> {
    frame: Rc<RefCell<Frame<V, F>>>,
}

impl<V, F> Clone for Scope<V, F> {
    fn clone(&self) -> Self {
        Self { frame: Rc::clone(&self.frame) }
    }
}

impl<V, F> Default for Scope<V, F> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<V, F> fmt::Debug for Scope<V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = self.frame.borrow();
        let mut variables: Vec<_> = frame.variables.keys().collect();
        variables.sort();
        f.debug_struct("Scope")
         .field("variables", &variables)
         .field("functions", &frame.functions.len())
         .field("has_parent", &frame.parent.is_some())
         .finish()
    }
}

impl<V, F> Scope<V, F> {
    /// Creates an empty scope below `parent`.
    #[must_use]
    pub fn new(parent: Option<Self>) -> Self {
        Self { frame: Rc::new(RefCell::new(Frame { parent,
                                                   variables: HashMap::new(),
                                                   functions: HashMap::new() })) }
    }

    /// Creates an empty child of this scope.
    #[must_use]
    pub fn child(&self) -> Self {
        Self::new(Some(self.clone()))
    }

    /// Defines a variable in this scope.
    ///
    /// Returns `false`, leaving the existing binding untouched, if this scope
    /// already defines the name. Ancestors are not consulted.
    pub fn define_variable(&self, name: impl Into<String>, variable: V) -> bool {
        let mut frame = self.frame.borrow_mut();
        let name = name.into();
        if frame.variables.contains_key(&name) {
            return false;
        }
        frame.variables.insert(name, variable);
        true
    }

    /// Defines a function in this scope.
    ///
    /// Returns `false`, leaving the existing binding untouched, if this scope
    /// already defines the same name with the same arity.
    pub fn define_function(&self, name: impl Into<String>, arity: usize, function: F) -> bool {
        let mut frame = self.frame.borrow_mut();
        let key = (name.into(), arity);
        if frame.functions.contains_key(&key) {
            return false;
        }
        frame.functions.insert(key, function);
        true
    }

    /// Replaces the value of the nearest variable called `name`.
    ///
    /// Returns `false` if no scope in the chain defines it.
    pub fn assign_variable(&self, name: &str, variable: V) -> bool {
        let mut frame = self.frame.borrow_mut();
        if let Some(slot) = frame.variables.get_mut(name) {
            *slot = variable;
            return true;
        }
        match &frame.parent {
            Some(parent) => parent.assign_variable(name, variable),
            None => false,
        }
    }

    /// Drops every binding of this frame. Used to break reference cycles
    /// between closures and the scope that holds them.
    pub fn clear(&self) {
        let mut frame = self.frame.borrow_mut();
        frame.variables.clear();
        frame.functions.clear();
    }
}

impl<V: Clone, F: Clone> Scope<V, F> {
    /// Finds the nearest variable called `name`.
    #[must_use]
    pub fn lookup_variable(&self, name: &str) -> Option<V> {
        let frame = self.frame.borrow();
        match frame.variables.get(name) {
            Some(variable) => Some(variable.clone()),
            None => frame.parent.as_ref()?.lookup_variable(name),
        }
    }

    /// Finds the nearest function called `name` taking `arity` arguments.
    #[must_use]
    pub fn lookup_function(&self, name: &str, arity: usize) -> Option<F> {
        let frame = self.frame.borrow();
        match frame.functions.get(&(name.to_string(), arity)) {
            Some(function) => Some(function.clone()),
            None => frame.parent.as_ref()?.lookup_function(name, arity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestScope = Scope<i32, &'static str>;

    #[test]
    fn lookup_walks_to_the_root() {
        let root = TestScope::default();
        root.define_variable("x", 1);
        root.define_function("f", 1, "root f");

        let child = root.child().child();

        assert_eq!(child.lookup_variable("x"), Some(1));
        assert_eq!(child.lookup_function("f", 1), Some("root f"));
        assert_eq!(child.lookup_function("f", 2), None);
        assert_eq!(child.lookup_variable("y"), None);
    }

    #[test]
    fn child_definitions_shadow_and_vanish_with_the_child() {
        let root = TestScope::default();
        root.define_variable("x", 1);

        let child = root.child();
        assert!(child.define_variable("x", 2));
        assert_eq!(child.lookup_variable("x"), Some(2));

        drop(child);
        assert_eq!(root.lookup_variable("x"), Some(1));
    }

    #[test]
    fn redefinition_in_the_same_frame_is_refused() {
        let root = TestScope::default();
        assert!(root.define_variable("x", 1));
        assert!(!root.define_variable("x", 2));
        assert_eq!(root.lookup_variable("x"), Some(1));

        assert!(root.define_function("f", 0, "first"));
        assert!(root.define_function("f", 1, "other arity"));
        assert!(!root.define_function("f", 0, "second"));
    }

    #[test]
    fn assignment_updates_the_declaring_scope() {
        let root = TestScope::default();
        root.define_variable("x", 1);
        let child = root.child();

        assert!(child.assign_variable("x", 5));
        assert_eq!(root.lookup_variable("x"), Some(5));
        assert!(!child.assign_variable("missing", 0));
    }

    #[test]
    fn handles_share_a_frame() {
        let root = TestScope::default();
        let alias = root.clone();
        alias.define_variable("x", 3);

        assert_eq!(root.lookup_variable("x"), Some(3));
        assert!(!root.define_variable("x", 4));
        assert_eq!(alias.child().lookup_variable("x"), Some(3));
    }
}
