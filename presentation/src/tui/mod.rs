//! Terminal user interface

mod app;
pub mod command;
pub mod keys;
pub mod render;
pub mod state;
pub mod surface;

pub use app::TuiApp;
pub use state::TuiState;
pub use surface::{SurfaceController, SwitchOutcome};
