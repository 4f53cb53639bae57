//! Domain layer for weave-chat
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Tools and Permissions
//!
//! A **tool** is a named, side-effecting capability the model may request
//! (read a file, run a command, call a mesh peer). Every tool carries a
//! permission level:
//!
//! - **Allow**: run without prompting
//! - **Ask**: prompt the user per call
//! - **Deny**: never run
//!
//! The default is derived from the tool's `requires_approval` flag and can be
//! overridden per session through the [`PermissionStore`].
//!
//! ## Sessions and Surfaces
//!
//! A **streaming session** is the lifecycle of one model response, including
//! any tool calls it triggers. An **interaction mode** names the UI surface
//! that currently owns keyboard input; only one is active at a time.

pub mod error;
pub mod interaction;
pub mod permission;
pub mod session;
pub mod tool;

// Re-export commonly used types
pub use error::DomainError;
pub use interaction::InteractionMode;
pub use permission::{PermissionLevel, PermissionStore};
pub use session::{
    state::SessionState,
    stream::StreamEvent,
    transcript::{Transcript, TranscriptEntry},
};
pub use tool::{
    entities::{ToolCall, ToolCatalog, ToolCategory, ToolDefinition, ToolParameter},
    validate::{CallValidator, ToolValidator},
    value_objects::{ToolError, ToolResult},
};
