//! Application layer: persistence, sheet generation, export, and the
//! update flow. UI widgets live under `crate::ui`; everything here is
//! driven by `Message` values dispatched from the main loop.

pub mod error;
pub mod export;
pub mod messages;
pub mod sheet;
pub mod state;
pub mod store;
pub mod update_flow;
pub mod updater;

// Re-exports for convenient external access
pub use error::{AppError, Result};
pub use messages::Message;
pub use sheet::{DayRow, Page};
pub use store::RosterStore;
pub use update_flow::{ShellCommand, SurfaceRequest, UpdateEvent, UpdateOrchestrator, UpdatePhase};
