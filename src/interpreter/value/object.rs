use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::interpreter::{evaluator::core::EvalResult, value::core::Value};

/// A method implemented by the host. `arguments[0]` is the receiver.
pub type NativeMethod = Rc<dyn Fn(&[Value]) -> EvalResult<Value>>;

/// A runtime object provided by an embedder.
///
/// Fields live behind a `RefCell` so that every `Value::Object` handle to the
/// same object observes assignments made through any other handle. Methods
/// are keyed by name and arity, the arity counting the receiver.
pub struct Object {
    type_name: String,
    fields:    RefCell<HashMap<String, Value>>,
    methods:   HashMap<(String, usize), NativeMethod>,
}

impl Object {
    /// Creates an object without fields or methods.
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self { type_name: type_name.into(),
               fields:    RefCell::new(HashMap::new()),
               methods:   HashMap::new(), }
    }

    /// Adds a field holding `value`.
    #[must_use]
    pub fn with_field(self, name: impl Into<String>, value: Value) -> Self {
        self.fields.borrow_mut().insert(name.into(), value);
        self
    }

    /// Adds a method taking `arity` explicit arguments besides the receiver.
    ///
    /// # Example
    /// ```
    /// use std::rc::Rc;
    ///
    /// use plc::interpreter::value::{core::Value, object::Object};
    ///
    /// let counter = Object::new("Counter").with_field("count", Value::from(0))
    ///                                     .with_method("get", 0, Rc::new(|args| {
    ///                                         let this = args[0].as_object(0)?;
    ///                                         Ok(this.field("count").unwrap_or(Value::Nil))
    ///                                     }));
    ///
    /// assert!(counter.method("get", 1).is_some());
    /// assert!(counter.method("get", 0).is_none());
    /// ```
    #[must_use]
    pub fn with_method(mut self,
                       name: impl Into<String>,
                       arity: usize,
                       method: NativeMethod)
                       -> Self {
        self.methods.insert((name.into(), arity + 1), method);
        self
    }

    /// The name of the object's type.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Reads a field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<Value> {
        self.fields.borrow().get(name).cloned()
    }

    /// Overwrites an existing field. Returns `false` if there is no such
    /// field; objects never gain fields at run time.
    pub fn set_field(&self, name: &str, value: Value) -> bool {
        match self.fields.borrow_mut().get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            },
            None => false,
        }
    }

    /// Finds a method by name and arity, receiver included.
    #[must_use]
    pub fn method(&self, name: &str, arity: usize) -> Option<NativeMethod> {
        self.methods.get(&(name.to_string(), arity)).cloned()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<_> = self.methods.keys().collect();
        methods.sort();
        f.debug_struct("Object")
         .field("type_name", &self.type_name)
         .field("fields", &self.fields.borrow())
         .field("methods", &methods)
         .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_are_shared_between_handles() {
        let value = Value::from(Object::new("Point").with_field("x", Value::from(1)));
        let alias = value.clone();

        let object = value.as_object(0).unwrap();
        assert!(object.set_field("x", Value::from(5)));
        assert!(!object.set_field("y", Value::from(5)));

        assert_eq!(alias.as_object(0).unwrap().field("x"), Some(Value::from(5)));
    }

    #[test]
    fn methods_receive_the_receiver_first() {
        let object = Object::new("Echo").with_method("first",
                                                     1,
                                                     Rc::new(|args| Ok(args[0].clone())));
        let method = object.method("first", 2).unwrap();

        assert_eq!(method(&[Value::from("self"), Value::from(1)]).unwrap(),
                   Value::from("self"));
    }
}
