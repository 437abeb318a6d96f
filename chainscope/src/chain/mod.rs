//! Value chaining.
//!
//! A [`ChainEngine`] holds an original value and a running `current`
//! value. Every operation a [`Block`] sends through the engine is applied
//! to `current`, and its result becomes the next `current`.

pub mod block;
pub mod engine;

pub use block::Block;
pub use engine::{ChainEngine, Phase};
