//! Hook dispatch implementations.

mod registry;

pub use registry::{ActionCallback, FilterCallback, HookRegistry};
