//! Tool domain model
//!
//! Entities describing the tools the model may invoke, the immutable
//! [`ToolCatalog`](entities::ToolCatalog) holding them, validation of
//! model-issued calls, and the result/error value objects every invocation
//! produces.

pub mod entities;
pub mod validate;
pub mod value_objects;
