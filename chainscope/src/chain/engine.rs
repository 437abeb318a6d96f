use crate::chain::Block;
use crate::combined::{self, BlockScope};
use crate::config::{AmbiguityPolicy, EngineConfig, ReplacementPolicy};
use crate::resolver::{ResolutionOutcome, ResolutionRequest};
use crate::runtime::dispatch::{AmbiguityHook, BlankSlate, Receiver};
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::values::{Arity, Value};
use crate::scope::CapturedScope;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// Lifecycle of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// `current` is a fresh duplicate of `original` and no block has run.
    Initialized,
    /// A block has been started against the chain. The phase stays here
    /// once the block returns, until `finish` hands out `current`.
    Running,
    /// `finish` has handed out `current`. A later `run` starts again.
    Finished,
}

struct ChainState {
    original: Value,
    current: Value,
    phase: Phase,
    config: EngineConfig,
}

/// Threads a running value through the operations of a block.
///
/// Cloning the handle shares the chain. Borrows of the state never span a
/// dispatch, so a nested chain or the ambiguity hook can call back into
/// the same engine while an operation is in flight.
#[derive(Clone)]
pub struct ChainEngine {
    state: Rc<RefCell<ChainState>>,
}

impl ChainEngine {
    pub fn begin(subject: impl Into<Value>) -> Self {
        Self::with_config(subject, EngineConfig::default())
    }

    pub fn with_config(subject: impl Into<Value>, config: EngineConfig) -> Self {
        let original = subject.into();
        let current = original.duplicate();
        debug!(original = %original, ?config, "chain initialized");
        ChainEngine {
            state: Rc::new(RefCell::new(ChainState {
                original,
                current,
                phase: Phase::Initialized,
                config,
            })),
        }
    }

    pub fn original(&self) -> Value {
        self.state.borrow().original.clone()
    }

    pub fn current(&self) -> Value {
        self.state.borrow().current.clone()
    }

    pub fn set_current(&self, value: impl Into<Value>) {
        self.state.borrow_mut().current = value.into();
    }

    pub fn phase(&self) -> Phase {
        self.state.borrow().phase
    }

    pub fn config(&self) -> EngineConfig {
        self.state.borrow().config
    }

    pub fn ptr_eq(&self, other: &ChainEngine) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    /// A separate chain over the same original, starting from a copy of
    /// this chain's current value.
    pub fn duplicate(&self) -> ChainEngine {
        let state = self.state.borrow();
        ChainEngine {
            state: Rc::new(RefCell::new(ChainState {
                original: state.original.clone(),
                current: state.current.duplicate(),
                phase: state.phase,
                config: state.config,
            })),
        }
    }

    fn set_phase(&self, phase: Phase) {
        let mut state = self.state.borrow_mut();
        if state.phase != phase {
            debug!(from = ?state.phase, to = ?phase, "chain phase");
            state.phase = phase;
        }
    }

    /// Evaluate a block against this chain.
    ///
    /// The block's arity is checked first; an unsupported one fails before
    /// any operation runs and leaves the chain untouched.
    pub fn run(&self, block: Block<'_>) -> RuntimeResult<ChainEngine> {
        let arity = block.check_arity()?;
        self.set_phase(Phase::Running);

        match block {
            Block::Scoped { scope, body } => {
                let cx = BlockScope::new(Value::Engine(self.clone()), scope.as_ref());
                body(&cx)?;
            }
            Block::Yield(body) => {
                body(self)?;
            }
            Block::Callable(callable) => {
                let args = match arity {
                    Arity::Fixed(0) => Vec::new(),
                    _ => vec![Value::Engine(self.clone())],
                };
                callable.invoke(args)?;
            }
        }

        Ok(self.clone())
    }

    /// Carry out a resolved request with this engine as the subject.
    pub fn apply(
        &self,
        outcome: ResolutionOutcome,
        request: ResolutionRequest,
        scope: &dyn CapturedScope,
    ) -> RuntimeResult<Value> {
        match outcome {
            ResolutionOutcome::Inner => self.send(&request.name, request.args),
            other => combined::execute(&Value::Engine(self.clone()), scope, other, request),
        }
    }

    /// Hand out the current value.
    pub fn finish(&self) -> Value {
        self.set_phase(Phase::Finished);
        self.current()
    }

    pub fn as_engine(&self) -> ChainEngine {
        self.clone()
    }

    /// Keep chaining: run `block` if there is one, then hand back this engine.
    pub fn chain(&self, block: Option<Block<'_>>) -> RuntimeResult<ChainEngine> {
        match block {
            Some(block) => self.run(block),
            None => Ok(self.clone()),
        }
    }

    pub fn responds_to(&self, name: &str) -> bool {
        self.current().responds_to(name)
    }

    /// Forward a call to the current value and thread the result.
    pub fn send(&self, name: &str, args: Vec<Value>) -> RuntimeResult<Value> {
        let previous = self.current();
        let result = previous.send(name, args)?;
        self.replace_current(name, &previous, result.clone());
        Ok(result)
    }

    fn replace_current(&self, name: &str, previous: &Value, result: Value) {
        let policy = self.state.borrow().config.replacement;
        match policy {
            ReplacementPolicy::AlwaysReplace => self.set_current(result),
            ReplacementPolicy::ReplaceIfSameType => {
                let (from, to) = (chain_kind(previous), chain_kind(&result));
                if from == to {
                    self.set_current(result);
                } else {
                    debug!(method = name, %from, %to, "chain broken by type change");
                }
            }
        }
    }

    fn continues_chain(&self, outer: &Value, policy: AmbiguityPolicy) -> bool {
        let original = self.original();
        *outer == original
            || (policy == AmbiguityPolicy::Permissive
                && chain_kind(outer) == chain_kind(&original))
    }
}

/// The runtime kind a value stands for in a chain. An engine stands for
/// whatever it currently holds.
fn chain_kind(value: &Value) -> String {
    match value {
        Value::Engine(engine) => chain_kind(&engine.current()),
        other => other.type_name().to_string(),
    }
}

impl AmbiguityHook for ChainEngine {
    fn ambiguous_dispatch(
        &self,
        outer: &Value,
        name: &str,
        args: Vec<Value>,
    ) -> RuntimeResult<Value> {
        let policy = self.config().ambiguity;

        if self.continues_chain(outer, policy) {
            debug!(method = name, ?policy, "ambiguity resolved into the chain");
            return self.send(name, args);
        }

        if policy != AmbiguityPolicy::Strict && outer.responds_to(name) {
            debug!(method = name, ?policy, "ambiguity resolved to the outer receiver");
            return outer.send(name, args);
        }

        Err(RuntimeError::UndispatchableAmbiguity {
            name: name.to_string(),
            outer: outer.describe(),
        })
    }
}

impl Receiver for ChainEngine {
    fn responds_to(&self, name: &str) -> bool {
        ChainEngine::responds_to(self, name)
    }

    fn send(&self, name: &str, args: Vec<Value>) -> RuntimeResult<Value> {
        ChainEngine::send(self, name, args)
    }

    fn describe(&self) -> String {
        self.to_string()
    }

    fn ambiguity_hook(&self) -> Option<&dyn AmbiguityHook> {
        Some(self as &dyn AmbiguityHook)
    }
}

impl BlankSlate for ChainEngine {}

impl fmt::Display for ChainEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        write!(
            f,
            "#<ChainEngine original: {}, current: {}>",
            state.original, state.current
        )
    }
}

impl fmt::Debug for ChainEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ChainEngine")
            .field("original", &state.original)
            .field("current", &state.current)
            .field("phase", &state.phase)
            .finish()
    }
}
