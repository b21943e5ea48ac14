// Instance Menu - Library exports for the binary, tests and benchmarks

pub mod cli;
pub mod command;
pub mod config;
pub mod instance;
pub mod menu;

// Re-export commonly used types for convenience
pub use command::{
    IgnoreReason, InstanceAction, Invoker, Operation, OperationRegistry, Outcome,
    ReversibleCommand, Slot, setup_menu,
};
pub use config::{ConfigError, MenuConfig};
pub use instance::{FleetState, InstanceManager, Notification};
pub use menu::{MenuChoice, SessionSummary, render_menu, run_session};
