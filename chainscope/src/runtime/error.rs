// Error handling for the chainscope runtime

use crate::runtime::values::Arity;

pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Runtime errors raised while resolving names or threading a chain.
///
/// None of these are retried inside the crate: they surface at the point of
/// detection and leave the chain's current value as it was last assigned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    /// Subject and outer receiver both implement the name and nothing
    /// disambiguated the call.
    #[error("method `{name}` exists on both {outer} (outside) and {inner} (inside)")]
    AmbiguousName {
        name: String,
        outer: String,
        inner: String,
    },

    /// The disambiguation hook could not pick a target.
    #[error("don't know how to dispatch `{name}`: outer receiver {outer} is not the chain's original")]
    UndispatchableAmbiguity { name: String, outer: String },

    /// The explicit outer accessor was called with arguments.
    #[error("outer variable `{name}` can't take arguments (got {count})")]
    OuterArgumentsUnsupported { name: String, count: usize },

    /// The explicit outer accessor found neither a variable nor a method.
    #[error("no such outer variable or method `{0}`")]
    OuterNameNotFound(String),

    /// Blocks take zero or one parameters.
    #[error("don't know how to handle block arity {0}")]
    UnsupportedBlockArity(Arity),

    /// Raised by a receiver's own dispatch when it cannot handle a name.
    #[error("undefined method `{name}` for {receiver}")]
    NoMethod { name: String, receiver: String },

    /// Type errors (wrong type for operation)
    #[error("Type error in {operation}: expected {expected}, got {actual}")]
    TypeError {
        expected: String,
        actual: String,
        operation: String,
    },

    /// Arity mismatch (wrong number of arguments)
    #[error("Arity mismatch in {function}: expected {expected}, got {actual}")]
    ArityMismatch {
        function: String,
        expected: String,
        actual: usize,
    },

    /// Value is not callable
    #[error("Not callable: {0}")]
    NotCallable(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Runtime error: {0}")]
    Generic(String),
}

impl RuntimeError {
    pub fn no_method(name: &str, receiver: impl Into<String>) -> RuntimeError {
        RuntimeError::NoMethod {
            name: name.to_string(),
            receiver: receiver.into(),
        }
    }

    pub fn type_error(expected: &str, actual: &str, operation: &str) -> RuntimeError {
        RuntimeError::TypeError {
            expected: expected.to_string(),
            actual: actual.to_string(),
            operation: operation.to_string(),
        }
    }

    /// Terminal failures that arise from scope arbitration rather than from
    /// a receiver's own dispatch.
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            RuntimeError::AmbiguousName { .. }
                | RuntimeError::UndispatchableAmbiguity { .. }
                | RuntimeError::OuterArgumentsUnsupported { .. }
                | RuntimeError::OuterNameNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambiguous_message_names_both_targets() {
        let err = RuntimeError::AmbiguousName {
            name: "oops".to_string(),
            outer: "#<Example>".to_string(),
            inner: "#<Boat>".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("exists on both"));
        assert!(msg.contains("#<Example>"));
        assert!(msg.contains("#<Boat>"));
        assert!(err.is_resolution_error());
    }

    #[test]
    fn arity_error_renders_arity() {
        let err = RuntimeError::UnsupportedBlockArity(Arity::Fixed(2));
        assert_eq!(err.to_string(), "don't know how to handle block arity 2");
        assert!(!err.is_resolution_error());
    }
}
