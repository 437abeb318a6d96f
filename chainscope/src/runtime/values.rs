// Runtime value system for chainscope
// Every operation applied through a chain produces one of these.

use crate::chain::ChainEngine;
use crate::runtime::dispatch::Receiver;
use crate::runtime::error::{RuntimeError, RuntimeResult};
use indexmap::IndexMap;
use itertools::Itertools;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Keyword(String),
    Vector(Vec<Value>),
    Map(IndexMap<String, Value>),
    Function(Function),
    Object(Object),
    Engine(ChainEngine),
}

impl PartialEq for Value {
    /// Structural equality. An object carrying a payload compares as its
    /// payload and an engine compares as its current value.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Engine(a), Value::Engine(b)) => a.ptr_eq(b) || a.current() == b.current(),
            (Value::Engine(a), other) | (other, Value::Engine(a)) => a.current() == *other,
            (Value::Object(a), Value::Object(b)) => match (a.payload(), b.payload()) {
                (Some(pa), Some(pb)) => pa == pb,
                _ => a.ptr_eq(b),
            },
            (Value::Object(a), other) | (other, Value::Object(a)) => {
                a.payload().is_some_and(|p| p == other)
            }
            (Value::Nil, Value::Nil) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Keyword(a), Value::Keyword(b)) => a == b,
            (Value::Vector(a), Value::Vector(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Keyword(k) => write!(f, ":{}", k),
            Value::Vector(v) => write!(f, "[{}]", v.iter().join(", ")),
            Value::Map(m) => write!(
                f,
                "{{{}}}",
                m.iter().map(|(k, v)| format!("{}: {}", k, v)).join(", ")
            ),
            Value::Function(func) => write!(f, "#<function {}>", func.name()),
            Value::Object(obj) => match obj.payload() {
                Some(payload) => write!(f, "#<{} {}>", obj.class(), payload),
                None => write!(f, "#<{}>", obj.class()),
            },
            Value::Engine(engine) => write!(f, "{}", engine),
        }
    }
}

impl Value {
    /// Build an invocable value from a closure.
    pub fn function<F>(name: &str, arity: Arity, func: F) -> Value
    where
        F: Fn(Vec<Value>) -> RuntimeResult<Value> + 'static,
    {
        Value::Function(Function::Builtin(BuiltinFunction {
            name: name.to_string(),
            arity,
            func: Rc::new(func),
        }))
    }

    pub fn keyword(name: &str) -> Value {
        Value::Keyword(name.to_string())
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Boolean(b) => *b,
            Value::Nil => false,
            _ => true,
        }
    }

    /// Runtime kind of the value. Objects with a payload report the
    /// payload's kind, so a decorated vector is still a vector.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Nil => "nil",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Keyword(_) => "keyword",
            Value::Vector(_) => "vector",
            Value::Map(_) => "map",
            Value::Function(_) => "function",
            Value::Object(obj) => match obj.payload() {
                Some(payload) => payload.type_name(),
                None => obj.class(),
            },
            Value::Engine(_) => "engine",
        }
    }

    /// A copy that is equal to, but not identical with, `self`.
    pub fn duplicate(&self) -> Value {
        match self {
            Value::Object(obj) => Value::Object(obj.duplicate()),
            Value::Engine(engine) => Value::Engine(engine.duplicate()),
            other => other.clone(),
        }
    }

    /// Identity comparison, as opposed to `==`.
    pub fn is_identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Engine(a), Value::Engine(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::Vector(a), Value::Vector(b)) => !a.is_empty() && a.as_ptr() == b.as_ptr(),
            (Value::String(a), Value::String(b)) => !a.is_empty() && a.as_ptr() == b.as_ptr(),
            (Value::Map(a), Value::Map(b)) => std::ptr::eq(a, b),
            _ => false,
        }
    }

    pub fn is_invocable(&self) -> bool {
        match self {
            Value::Function(_) => true,
            Value::Object(obj) => obj.has_method("call"),
            _ => false,
        }
    }

    /// Invoke a callable value with positional arguments.
    pub fn invoke(&self, args: Vec<Value>) -> RuntimeResult<Value> {
        match self {
            Value::Function(func) => func.call(args),
            Value::Object(obj) if obj.has_method("call") => self.send("call", args),
            other => Err(RuntimeError::NotCallable(other.to_string())),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i as i64)
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        Value::Integer(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Vector(items.into_iter().map(Into::into).collect())
    }
}

impl From<Function> for Value {
    fn from(func: Function) -> Self {
        Value::Function(func)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj)
    }
}

impl From<ChainEngine> for Value {
    fn from(engine: ChainEngine) -> Self {
        Value::Engine(engine)
    }
}

#[derive(Clone)]
pub enum Function {
    Builtin(BuiltinFunction),
}

impl Function {
    pub fn name(&self) -> &str {
        match self {
            Function::Builtin(b) => &b.name,
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Function::Builtin(b) => b.arity.clone(),
        }
    }

    pub fn call(&self, args: Vec<Value>) -> RuntimeResult<Value> {
        let arity = self.arity();
        if !arity.accepts(args.len()) {
            return Err(RuntimeError::ArityMismatch {
                function: self.name().to_string(),
                expected: arity.to_string(),
                actual: args.len(),
            });
        }
        match self {
            Function::Builtin(b) => (b.func)(args),
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Function::Builtin(b) => b.fmt(f),
        }
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Function::Builtin(a), Function::Builtin(b)) => a == b,
        }
    }
}

#[derive(Clone)]
pub struct BuiltinFunction {
    pub name: String,
    pub arity: Arity,
    pub func: Rc<dyn Fn(Vec<Value>) -> RuntimeResult<Value>>,
}

impl fmt::Debug for BuiltinFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

impl PartialEq for BuiltinFunction {
    fn eq(&self, other: &Self) -> bool {
        // Closures have no structural identity; same name alone is not enough.
        self.name == other.name && Rc::ptr_eq(&self.func, &other.func)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Arity {
    Fixed(usize),
    Variadic(usize), // Minimum number of arguments
    Range(usize, usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Arity::Fixed(n) => count == *n,
            Arity::Variadic(min) => count >= *min,
            Arity::Range(min, max) => count >= *min && count <= *max,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Fixed(n) => write!(f, "{}", n),
            Arity::Variadic(min) => write!(f, "variadic (at least {})", min),
            Arity::Range(min, max) => write!(f, "{}..={}", min, max),
        }
    }
}

pub type MethodFn = Rc<dyn Fn(&Value, Vec<Value>) -> RuntimeResult<Value>>;

/// A named receiver with its own methods. When it carries a payload, names
/// it does not define itself are handled by the payload.
#[derive(Clone)]
pub struct Object(Rc<ObjectData>);

struct ObjectData {
    class: String,
    payload: Option<Value>,
    methods: IndexMap<String, MethodFn>,
}

impl Object {
    pub fn builder(class: &str) -> ObjectBuilder {
        ObjectBuilder {
            class: class.to_string(),
            payload: None,
            methods: IndexMap::new(),
        }
    }

    pub fn class(&self) -> &str {
        &self.0.class
    }

    pub fn payload(&self) -> Option<&Value> {
        self.0.payload.as_ref()
    }

    pub fn method(&self, name: &str) -> Option<MethodFn> {
        self.0.methods.get(name).cloned()
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.0.methods.contains_key(name)
    }

    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Same class and methods, fresh identity, duplicated payload.
    pub fn duplicate(&self) -> Object {
        Object(Rc::new(ObjectData {
            class: self.0.class.clone(),
            payload: self.0.payload.as_ref().map(Value::duplicate),
            methods: self.0.methods.clone(),
        }))
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("class", &self.0.class)
            .field("payload", &self.0.payload)
            .field("methods", &self.0.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

pub struct ObjectBuilder {
    class: String,
    payload: Option<Value>,
    methods: IndexMap<String, MethodFn>,
}

impl ObjectBuilder {
    pub fn payload(mut self, payload: impl Into<Value>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Define a method. The closure receives the object itself as a value.
    pub fn method<F>(mut self, name: &str, func: F) -> Self
    where
        F: Fn(&Value, Vec<Value>) -> RuntimeResult<Value> + 'static,
    {
        self.methods.insert(name.to_string(), Rc::new(func));
        self
    }

    pub fn build(self) -> Value {
        Value::Object(Object(Rc::new(ObjectData {
            class: self.class,
            payload: self.payload,
            methods: self.methods,
        })))
    }
}
