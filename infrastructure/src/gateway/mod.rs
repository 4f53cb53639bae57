//! Mesh daemon gateway adapter

mod daemon;
mod wire;

pub use daemon::DaemonModelGateway;
