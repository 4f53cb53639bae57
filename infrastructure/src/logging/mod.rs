//! Logging sinks

mod jsonl_logger;

pub use jsonl_logger::JsonlDecisionLog;
