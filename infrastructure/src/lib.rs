//! Infrastructure layer for weave
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the local tool runner and its built-in tools, the
//! mesh daemon gateway, configuration file loading, and the JSONL
//! decision logger.

pub mod config;
pub mod gateway;
pub mod logging;
pub mod tools;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig, FileDaemonConfig, FileSessionConfig, FileToolsConfig};
pub use gateway::DaemonModelGateway;
pub use logging::JsonlDecisionLog;
pub use tools::{LocalToolRunner, default_catalog, read_only_catalog};
