//! Application layer for weave-chat
//!
//! Ports (interfaces to the model provider, tool runner, and decision log)
//! and the [`controller::ChatController`], the single-consumer actor that
//! owns the streaming session state machine, the execution pipeline, the
//! permission store, and the approval coordinator.

pub mod approval;
pub mod controller;
pub mod ports;

pub use approval::{ApprovalCoordinator, ApprovalDecision, PendingApproval};
pub use controller::{
    ChatController, ControllerClosed, ControllerConfig, ControllerHandle, UiEvent,
};
pub use ports::{
    decision_log::{DecisionKind, DecisionLog, DecisionRecord, NullDecisionLog},
    model_gateway::{GatewayError, ModelGateway, StreamHandle},
    tool_runner::ToolRunnerPort,
};
