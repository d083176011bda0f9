//! Domain entities - post records and their stored field values.

mod post;
mod value;

pub use post::{DERIVED_FIELDS, INT_FIELDS, Post, post_key};
pub use value::{Document, FieldValue};
