//! Services - domain operations composed over the ports.

mod post_fields;

pub use post_fields::PostFieldStore;
