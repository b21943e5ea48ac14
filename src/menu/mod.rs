// Interactive numbered menu driving an Invoker

pub mod choice;
pub mod session;

pub use choice::{MenuChoice, render_menu};
pub use session::{SessionError, SessionResult, SessionSummary, run_session};
