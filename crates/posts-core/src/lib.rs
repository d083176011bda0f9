//! # Posts Core
//!
//! The domain layer for forum post records.
//! This crate contains the post model, the field normalizer and the
//! `PostFieldStore` service, with storage and hooks reached only through ports.

pub mod domain;
pub mod error;
pub mod normalize;
pub mod ports;
pub mod service;

pub use domain::{Document, FieldValue, Post};
pub use error::PostError;
pub use service::PostFieldStore;
