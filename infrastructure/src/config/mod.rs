//! Configuration loading and schema

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileDaemonConfig, FileLoggingConfig, FileSessionConfig, FileToolsConfig,
};
pub use loader::ConfigLoader;
