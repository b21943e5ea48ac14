// Instance management receiver
//
// The InstanceManager is the object every menu action acts upon. It tracks
// how many instances exist and whether they run, and each effect writes one
// notification line to its output and records it in a journal.

pub mod manager;

pub use manager::{FleetState, InstanceManager, Notification};
