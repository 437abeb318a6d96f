// chainscope library
// Dual-scope call resolution and value chaining for blocks of operations
pub mod chain;
pub mod combined;
pub mod config;
pub mod resolver;
pub mod runtime;
pub mod scope;

// Re-export the pieces a caller needs to build and run a chain.
pub use chain::{Block, ChainEngine, Phase};
pub use combined::BlockScope;
pub use config::{AmbiguityPolicy, EngineConfig, ReplacementPolicy};
pub use resolver::{ResolutionOutcome, ResolutionRequest, ScopeResolver};
pub use runtime::{
    AmbiguityHook, Arity, BlankSlate, Function, Object, Receiver, RuntimeError, RuntimeResult,
    Value,
};
pub use scope::{Binding, CapturedScope, OuterScope};

/// Run `block` against a copy of `subject` and return the resulting value.
///
/// ```
/// use chainscope::{final_value, Block, Binding, Value};
///
/// let evens = final_value(
///     vec![1, 2, 3, 4, 5, 6, 7, 8],
///     Block::scoped(Binding::toplevel(), |cx| {
///         cx.call("select", vec![Value::keyword("even?")])
///     }),
/// )
/// .unwrap();
/// assert_eq!(evens, Value::from(vec![2, 4, 6, 8]));
/// ```
pub fn final_value(subject: impl Into<Value>, block: Block<'_>) -> RuntimeResult<Value> {
    final_value_with_config(subject, block, EngineConfig::default())
}

pub fn final_value_with_config(
    subject: impl Into<Value>,
    block: Block<'_>,
    config: EngineConfig,
) -> RuntimeResult<Value> {
    Ok(ChainEngine::with_config(subject, config).run(block)?.finish())
}

/// Build an engine over `subject`, run `block` if given, and return the
/// engine for further chaining or inspection.
pub fn engine(subject: impl Into<Value>, block: Option<Block<'_>>) -> RuntimeResult<ChainEngine> {
    engine_with_config(subject, block, EngineConfig::default())
}

pub fn engine_with_config(
    subject: impl Into<Value>,
    block: Option<Block<'_>>,
    config: EngineConfig,
) -> RuntimeResult<ChainEngine> {
    ChainEngine::with_config(subject, config).chain(block)
}
