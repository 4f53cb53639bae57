//! Ports (interfaces) for the application layer
//!
//! Adapters live in the infrastructure layer; test doubles live next to the
//! controller tests.

pub mod decision_log;
pub mod model_gateway;
pub mod tool_runner;
