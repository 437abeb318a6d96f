// Runtime system for chainscope
// This module contains the value model, native methods and dispatch

pub mod dispatch;
pub mod error;
pub mod methods;
pub mod values;

pub use dispatch::{AmbiguityHook, BlankSlate, Receiver};
pub use error::{RuntimeError, RuntimeResult};
pub use values::{Arity, Function, Object, ObjectBuilder, Value};
