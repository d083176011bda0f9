//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod document_store;
mod hooks;

pub use document_store::{DocumentStore, StoreError};
pub use hooks::{
    ACTION_POST_SET_FIELDS, FILTER_POST_GET_FIELDS, GetFieldsPayload, HookError, PostHooks,
    SetFieldsPayload,
};
