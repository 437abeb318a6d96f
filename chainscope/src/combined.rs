//! The context a zero-parameter block is evaluated in.
//!
//! A [`BlockScope`] joins a subject with the scope the block was written
//! in. Each call site the block issues goes through the resolver and is
//! then executed against whichever side the outcome names.

use crate::resolver::{ResolutionOutcome, ResolutionRequest, ScopeResolver};
use crate::runtime::dispatch::Receiver;
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::values::Value;
use crate::scope::{CapturedScope, OuterScope};

pub struct BlockScope<'s> {
    subject: Value,
    scope: &'s dyn CapturedScope,
    resolver: ScopeResolver,
}

impl<'s> BlockScope<'s> {
    pub fn new(subject: Value, scope: &'s dyn CapturedScope) -> Self {
        BlockScope {
            subject,
            scope,
            resolver: ScopeResolver::new(),
        }
    }

    /// A bare identifier, e.g. `bound`.
    pub fn ident(&self, name: &str) -> RuntimeResult<Value> {
        self.dispatch(ResolutionRequest::ident(name))
    }

    /// A call written with call syntax, e.g. `reverse()` or `fn(1)`.
    pub fn call(&self, name: &str, args: Vec<Value>) -> RuntimeResult<Value> {
        self.dispatch(ResolutionRequest::call(name, args))
    }

    /// A call with arguments but no call syntax, e.g. `multiply factor: 3`.
    pub fn command(&self, name: &str, args: Vec<Value>) -> RuntimeResult<Value> {
        self.dispatch(ResolutionRequest::command(name, args))
    }

    pub fn resolve(&self, request: &ResolutionRequest) -> ResolutionOutcome {
        self.resolver.resolve(request, &self.subject, self.scope)
    }

    pub fn dispatch(&self, request: ResolutionRequest) -> RuntimeResult<Value> {
        let outcome = self.resolve(&request);
        match &self.subject {
            Value::Engine(engine) => engine.apply(outcome, request, self.scope),
            subject => execute(subject, self.scope, outcome, request),
        }
    }

    /// The subject itself, bypassing resolution.
    pub fn inside(&self) -> &Value {
        &self.subject
    }

    /// Explicit, non-shadowed access to the outer scope.
    pub fn outside(&self) -> OuterScope<'s> {
        OuterScope::new(self.scope)
    }

    /// Captured variables count as names the block can use.
    pub fn responds_to(&self, name: &str) -> bool {
        self.scope.has_variable(name)
            || self.scope.outer_receiver().responds_to(name)
            || self.subject.responds_to(name)
    }

    pub fn scope(&self) -> &'s dyn CapturedScope {
        self.scope
    }
}

/// Carry out a resolved request against `subject` and `scope`.
pub fn execute(
    subject: &Value,
    scope: &dyn CapturedScope,
    outcome: ResolutionOutcome,
    request: ResolutionRequest,
) -> RuntimeResult<Value> {
    let ResolutionRequest { name, args, .. } = request;
    match outcome {
        ResolutionOutcome::Inner => subject.send(&name, args),
        ResolutionOutcome::Outer => scope.outer_receiver().send(&name, args),
        ResolutionOutcome::Variable(value) => Ok(value),
        ResolutionOutcome::InvokeCallable(callable) => callable.invoke(args),
        ResolutionOutcome::Ambiguous => match subject.ambiguity_hook() {
            Some(hook) => hook.ambiguous_dispatch(scope.outer_receiver(), &name, args),
            None => Err(RuntimeError::AmbiguousName {
                outer: scope.outer_receiver().describe(),
                inner: subject.describe(),
                name,
            }),
        },
        ResolutionOutcome::NotFound => Err(RuntimeError::no_method(&name, subject.describe())),
    }
}
