//! Capability dispatch.
//!
//! A [`Receiver`] is anything the resolver can ask "do you handle this
//! name?" and then send the call to. Values implement it through their
//! native method tables, objects through their own methods first, and
//! engines by forwarding into their chain.

use crate::runtime::error::RuntimeResult;
use crate::runtime::methods;
use crate::runtime::values::Value;
use tracing::trace;

pub trait Receiver {
    /// Whether `send(name, ..)` would find a behavior, base methods included.
    fn responds_to(&self, name: &str) -> bool;

    /// Dispatch a call. Failing to find `name` is the receiver's own
    /// `NoMethod` error, never the resolver's.
    fn send(&self, name: &str, args: Vec<Value>) -> RuntimeResult<Value>;

    fn describe(&self) -> String;

    /// The disambiguation callback consulted when both scopes handle a name.
    fn ambiguity_hook(&self) -> Option<&dyn AmbiguityHook> {
        None
    }
}

/// Lets a subject decide where a call both scopes can handle should go.
pub trait AmbiguityHook {
    fn ambiguous_dispatch(
        &self,
        outer: &Value,
        name: &str,
        args: Vec<Value>,
    ) -> RuntimeResult<Value>;
}

/// Marker for receivers whose only named behavior is what they forward.
/// Such a receiver can never introduce an ambiguity of its own.
pub trait BlankSlate: Receiver {}

impl Receiver for Value {
    fn responds_to(&self, name: &str) -> bool {
        match self {
            Value::Engine(engine) => engine.responds_to(name),
            Value::Object(obj) => {
                obj.has_method(name)
                    || methods::is_base_method(name)
                    || obj.payload().is_some_and(|p| p.responds_to(name))
            }
            other => methods::lookup(other, name).is_some() || methods::is_base_method(name),
        }
    }

    fn send(&self, name: &str, args: Vec<Value>) -> RuntimeResult<Value> {
        trace!(receiver = self.type_name(), method = name, argc = args.len(), "send");
        match self {
            Value::Engine(engine) => engine.send(name, args),
            Value::Object(obj) => {
                if let Some(method) = obj.method(name) {
                    return method(self, args);
                }
                if methods::is_base_method(name) {
                    return methods::send_base(self, name, args);
                }
                match obj.payload() {
                    Some(payload) if payload.responds_to(name) => payload.send(name, args),
                    _ => methods::send_base(self, name, args),
                }
            }
            other => match methods::lookup(other, name) {
                Some(method) => method(other, args),
                None => methods::send_base(other, name, args),
            },
        }
    }

    fn describe(&self) -> String {
        self.to_string()
    }

    fn ambiguity_hook(&self) -> Option<&dyn AmbiguityHook> {
        match self {
            Value::Engine(engine) => Some(engine as &dyn AmbiguityHook),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::error::RuntimeError;
    use crate::runtime::values::Object;

    #[test]
    fn object_methods_shadow_payload() {
        let obj = Object::builder("Collection")
            .payload(vec![1, 2, 3])
            .method("reverse", |_this, _args| Ok(Value::from("mine")))
            .build();
        assert_eq!(obj.send("reverse", vec![]).unwrap(), Value::from("mine"));
        assert_eq!(obj.send("count", vec![]).unwrap(), Value::Integer(3));
    }

    #[test]
    fn unknown_names_are_the_receivers_failure() {
        let obj = Object::builder("Example").build();
        assert!(!obj.responds_to("marie_celeste"));
        assert!(matches!(
            obj.send("marie_celeste", vec![]),
            Err(RuntimeError::NoMethod { ref name, .. }) if name == "marie_celeste"
        ));
    }

    #[test]
    fn plain_values_have_no_hook() {
        assert!(Value::Integer(1).ambiguity_hook().is_none());
    }
}
