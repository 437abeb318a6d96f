use crate::chain::ChainEngine;
use crate::combined::BlockScope;
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::values::{Arity, Value};
use crate::scope::CapturedScope;
use std::fmt;

type ScopedBody<'a> = Box<dyn FnOnce(&BlockScope<'_>) -> RuntimeResult<Value> + 'a>;
type YieldBody<'a> = Box<dyn FnOnce(&ChainEngine) -> RuntimeResult<Value> + 'a>;

/// A block of operations to run against a chain.
///
/// The return value of a block is ignored; only the operations it sends
/// through the engine count.
pub enum Block<'a> {
    /// Takes no parameters. Every call site goes through the resolver, with
    /// the engine as subject and `scope` as the scope it was written in.
    Scoped {
        scope: Box<dyn CapturedScope + 'a>,
        body: ScopedBody<'a>,
    },
    /// Takes the engine itself and bypasses resolution.
    Yield(YieldBody<'a>),
    /// A callable value; its declared arity picks the calling convention.
    Callable(Value),
}

impl<'a> Block<'a> {
    pub fn scoped<S, F>(scope: S, body: F) -> Self
    where
        S: CapturedScope + 'a,
        F: FnOnce(&BlockScope<'_>) -> RuntimeResult<Value> + 'a,
    {
        Block::Scoped {
            scope: Box::new(scope),
            body: Box::new(body),
        }
    }

    pub fn yielding<F>(body: F) -> Self
    where
        F: FnOnce(&ChainEngine) -> RuntimeResult<Value> + 'a,
    {
        Block::Yield(Box::new(body))
    }

    pub fn callable(value: impl Into<Value>) -> Self {
        Block::Callable(value.into())
    }

    /// Number of parameters the block declares.
    pub fn arity(&self) -> RuntimeResult<Arity> {
        match self {
            Block::Scoped { .. } => Ok(Arity::Fixed(0)),
            Block::Yield(_) => Ok(Arity::Fixed(1)),
            Block::Callable(Value::Function(func)) => Ok(func.arity()),
            // `call` on an object takes whatever it is given
            Block::Callable(value) if value.is_invocable() => Ok(Arity::Variadic(0)),
            Block::Callable(value) => Err(RuntimeError::NotCallable(value.to_string())),
        }
    }

    /// Only zero and one parameter blocks can be run.
    pub fn check_arity(&self) -> RuntimeResult<Arity> {
        match self.arity()? {
            arity @ (Arity::Fixed(0) | Arity::Fixed(1)) => Ok(arity),
            other => Err(RuntimeError::UnsupportedBlockArity(other)),
        }
    }
}

impl fmt::Debug for Block<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Block::Scoped { .. } => write!(f, "Block::Scoped"),
            Block::Yield(_) => write!(f, "Block::Yield"),
            Block::Callable(value) => f.debug_tuple("Block::Callable").field(value).finish(),
        }
    }
}
