//! Streaming session domain model
//!
//! One session is the lifecycle of a single model response: its state
//! machine ([`state::SessionState`]), the incremental events the provider
//! stream delivers ([`stream::StreamEvent`]), and the conversation
//! transcript the results fold into ([`transcript::Transcript`]).

pub mod state;
pub mod stream;
pub mod transcript;
