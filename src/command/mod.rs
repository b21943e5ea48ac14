// Command Pattern with undo/redo
//
// Numbered menu slots are bound to reversible commands. The Invoker runs the
// command for a selected slot and keeps linear undo/redo history.
//
// Architecture:
// - ReversibleCommand trait: Defines apply(), revert(), description()
// - Operation: the stock command, a forward/inverse effect pair
// - OperationRegistry: arena of bound commands addressed by 1-based slot
// - Invoker: done/undone stacks of handles into the registry
// - Concrete actions: InstanceAction and setup_menu

pub mod commands;
pub mod invoker;
pub mod registry;
pub mod trait_def;

pub use commands::{InstanceAction, setup_menu};
pub use invoker::{IgnoreReason, Invoker, Outcome};
pub use registry::{OperationHandle, OperationRegistry, Slot};
pub use trait_def::{Effect, Operation, ReversibleCommand};
