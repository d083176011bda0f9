//! # Posts Infrastructure
//!
//! Concrete implementations of the ports defined in `posts-core`.
//!
//! ## Feature Flags
//!
//! - `redis` (default) - Redis hash-backed document store
//!
//! Without `redis` only the in-memory store is built.

pub mod hooks;
pub mod store;

// Re-exports - In-Memory
pub use hooks::HookRegistry;
pub use store::InMemoryDocumentStore;

// Re-exports - Redis
#[cfg(feature = "redis")]
pub use store::{RedisConfig, RedisDocumentStore};
