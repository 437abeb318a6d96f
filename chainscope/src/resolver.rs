//! Scope resolution for call sites inside a block.
//!
//! Every call site in a block is turned into a [`ResolutionRequest`] and
//! resolved against two candidates: the subject the block runs against,
//! and the captured scope it was written in. Resolution is a pure function
//! of its inputs and always yields exactly one [`ResolutionOutcome`];
//! acting on that outcome is left to the caller.
//!
//! ## Precedence
//!
//! Evaluated in this order, first match wins:
//! 1. Both the subject and the outer receiver implement the name (base
//!    methods every value answers don't count): `Ambiguous`.
//! 2. A captured variable of that name: invoke it if it is callable and
//!    the call site is a forced call or carries arguments; fall back to
//!    the subject on a forced call to something not callable; otherwise
//!    the variable's value.
//! 3. The outer receiver implements the name: `Outer`.
//! 4. Otherwise `Inner`, and the subject's own dispatch reports a missing
//!    method if there is one.

use crate::runtime::dispatch::Receiver;
use crate::runtime::methods;
use crate::runtime::values::Value;
use crate::scope::CapturedScope;
use tracing::trace;

/// One call site.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionRequest {
    pub name: String,
    pub args: Vec<Value>,
    /// The call site used explicit call syntax, so it means "call a method"
    /// even when a variable of the same name is in scope.
    pub forced_call: bool,
}

impl ResolutionRequest {
    /// A bare identifier.
    pub fn ident(name: &str) -> Self {
        ResolutionRequest {
            name: name.to_string(),
            args: Vec::new(),
            forced_call: false,
        }
    }

    /// A call written with explicit call syntax.
    pub fn call(name: &str, args: Vec<Value>) -> Self {
        ResolutionRequest {
            name: name.to_string(),
            args,
            forced_call: true,
        }
    }

    /// A call with arguments but without explicit call syntax.
    pub fn command(name: &str, args: Vec<Value>) -> Self {
        ResolutionRequest {
            name: name.to_string(),
            args,
            forced_call: false,
        }
    }
}

/// Where a request should be dispatched.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionOutcome {
    /// Dispatch to the subject.
    Inner,
    /// Dispatch to the captured outer receiver.
    Outer,
    /// A captured local; its value is the result.
    Variable(Value),
    /// A captured local holding something callable; invoke it with the
    /// request's arguments.
    InvokeCallable(Value),
    /// Subject and outer receiver both implement the name.
    Ambiguous,
    /// Nothing implements the name. Only the explicit outer accessor
    /// produces this; plain resolution defers to the subject instead.
    NotFound,
}

/// A receiver implements `name` as a behavior of its own, not one every
/// value shares.
pub fn implements_specifically(receiver: &dyn Receiver, name: &str) -> bool {
    !methods::is_base_method(name) && receiver.responds_to(name)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ScopeResolver;

impl ScopeResolver {
    pub fn new() -> Self {
        ScopeResolver
    }

    pub fn resolve(
        &self,
        request: &ResolutionRequest,
        subject: &dyn Receiver,
        scope: &dyn CapturedScope,
    ) -> ResolutionOutcome {
        let outcome = resolve(request, subject, scope);
        trace!(name = %request.name, forced = request.forced_call, ?outcome, "resolved");
        outcome
    }
}

/// Resolve one request. See the module docs for the precedence rules.
pub fn resolve(
    request: &ResolutionRequest,
    subject: &dyn Receiver,
    scope: &dyn CapturedScope,
) -> ResolutionOutcome {
    let name = request.name.as_str();
    let outer = scope.outer_receiver();

    if implements_specifically(subject, name) && implements_specifically(outer, name) {
        return ResolutionOutcome::Ambiguous;
    }

    if scope.has_variable(name) {
        // has_variable and read_variable describe the same snapshot
        let value = scope.read_variable(name).unwrap_or(Value::Nil);
        return if value.is_invocable() && (request.forced_call || !request.args.is_empty()) {
            ResolutionOutcome::InvokeCallable(value)
        } else if request.forced_call {
            ResolutionOutcome::Inner
        } else {
            ResolutionOutcome::Variable(value)
        };
    }

    if outer.responds_to(name) {
        return ResolutionOutcome::Outer;
    }

    ResolutionOutcome::Inner
}
