//! Captured scopes.
//!
//! A block sees two scopes: the subject it is evaluated against, and the
//! scope it was written in. The latter is captured up front as a
//! [`Binding`]: a snapshot of named locals plus the enclosing receiver.
//! Nothing here walks a live stack; whatever the caller captured is all
//! the resolver will ever see.

use crate::resolver::ResolutionOutcome;
use crate::runtime::dispatch::Receiver;
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::values::{Arity, Value};
use indexmap::IndexMap;

/// Read-only view of the scope a block was written in.
pub trait CapturedScope {
    /// The value that lexically encloses the block.
    fn outer_receiver(&self) -> &Value;

    fn read_variable(&self, name: &str) -> Option<Value>;

    fn has_variable(&self, name: &str) -> bool {
        self.read_variable(name).is_some()
    }
}

/// A snapshot of local variables and the enclosing receiver.
#[derive(Debug, Clone)]
pub struct Binding {
    receiver: Value,
    locals: IndexMap<String, Value>,
}

impl Binding {
    pub fn new(receiver: impl Into<Value>) -> Self {
        Binding {
            receiver: receiver.into(),
            locals: IndexMap::new(),
        }
    }

    /// A binding with no enclosing receiver of interest.
    pub fn toplevel() -> Self {
        Self::new(Value::Nil)
    }

    pub fn with_local(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.define(name, value);
        self
    }

    /// Defines a new local or replaces an existing one.
    pub fn define(&mut self, name: &str, value: impl Into<Value>) {
        self.locals.insert(name.to_string(), value.into());
    }

    pub fn local_names(&self) -> Vec<String> {
        self.locals.keys().cloned().collect()
    }
}

impl CapturedScope for Binding {
    fn outer_receiver(&self) -> &Value {
        &self.receiver
    }

    fn read_variable(&self, name: &str) -> Option<Value> {
        self.locals.get(name).cloned()
    }

    fn has_variable(&self, name: &str) -> bool {
        self.locals.contains_key(name)
    }
}

/// Capture a receiver and a list of locals into a [`Binding`].
///
/// ```
/// use chainscope::{capture, scope::CapturedScope, Value};
///
/// let bound = 2;
/// let label = "evens";
/// let scope = capture!(Value::Nil; bound, label);
/// assert_eq!(scope.read_variable("bound"), Some(Value::Integer(2)));
/// ```
#[macro_export]
macro_rules! capture {
    ($receiver:expr) => {
        $crate::scope::Binding::new($crate::Value::from($receiver))
    };
    ($receiver:expr; $($name:ident),+ $(,)?) => {{
        let mut binding = $crate::scope::Binding::new($crate::Value::from($receiver));
        $(
            binding.define(stringify!($name), $crate::Value::from($name.clone()));
        )+
        binding
    }};
}

/// Explicit access to the outer scope by name.
///
/// Unlike plain resolution, nothing is deferred here: a name that is
/// neither a captured variable nor a method of the outer receiver fails
/// immediately, and outer names never take arguments.
pub struct OuterScope<'s> {
    scope: &'s dyn CapturedScope,
}

impl<'s> OuterScope<'s> {
    pub fn new(scope: &'s dyn CapturedScope) -> Self {
        OuterScope { scope }
    }

    /// Variables shadow receiver methods; anything else is `NotFound`.
    pub fn resolve(&self, name: &str) -> ResolutionOutcome {
        if let Some(value) = self.scope.read_variable(name) {
            ResolutionOutcome::Variable(value)
        } else if self.scope.outer_receiver().responds_to(name) {
            ResolutionOutcome::Outer
        } else {
            ResolutionOutcome::NotFound
        }
    }

    pub fn responds_to(&self, name: &str) -> bool {
        !matches!(self.resolve(name), ResolutionOutcome::NotFound)
    }

    pub fn get(&self, name: &str) -> RuntimeResult<Value> {
        self.call(name, Vec::new())
    }

    pub fn call(&self, name: &str, args: Vec<Value>) -> RuntimeResult<Value> {
        if !args.is_empty() {
            return Err(RuntimeError::OuterArgumentsUnsupported {
                name: name.to_string(),
                count: args.len(),
            });
        }
        match self.resolve(name) {
            ResolutionOutcome::Variable(value) => Ok(value),
            ResolutionOutcome::Outer => self.scope.outer_receiver().send(name, args),
            _ => Err(RuntimeError::OuterNameNotFound(name.to_string())),
        }
    }

    /// A zero-argument callable that reads `name` when invoked. Fails now
    /// rather than on invocation if the name resolves nowhere.
    pub fn method(&self, name: &str) -> RuntimeResult<Value> {
        match self.resolve(name) {
            ResolutionOutcome::Variable(value) => {
                Ok(Value::function(name, Arity::Fixed(0), move |_| Ok(value.clone())))
            }
            ResolutionOutcome::Outer => {
                let receiver = self.scope.outer_receiver().clone();
                let method = name.to_string();
                Ok(Value::function(name, Arity::Fixed(0), move |_| {
                    receiver.send(&method, Vec::new())
                }))
            }
            _ => Err(RuntimeError::OuterNameNotFound(name.to_string())),
        }
    }
}
