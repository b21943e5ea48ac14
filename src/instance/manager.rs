// InstanceManager - Receiver for the instance menu actions

use std::fmt;
use std::io::Write;

/// A notification emitted by one receiver effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notification {
    Listed,
    Created,
    Stopped,
    Started,
    Deleted,
    ListUndone,
    CreateUndone,
    StopUndone,
    StartUndone,
    DeleteUndone,
}

impl Notification {
    /// The line printed for this notification
    pub fn message(self) -> &'static str {
        match self {
            Notification::Listed => "Show instances",
            Notification::Created => "Creating Instances",
            Notification::Stopped => "Stopping Instances",
            Notification::Started => "Starting Instances",
            Notification::Deleted => "Deleting Instances",
            Notification::ListUndone => "Undo Show",
            Notification::CreateUndone => "Undo Creation",
            Notification::StopUndone => "Undo Stop",
            Notification::StartUndone => "Undo Start",
            Notification::DeleteUndone => "Undo Delete",
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Observable state of the managed instances
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FleetState {
    /// Number of instances that exist
    pub instances: usize,
    /// Whether the instances are running
    pub running: bool,
}

/// Receiver that the instance menu actions operate on
///
/// Every effect has an exact inverse as long as inverses are called in
/// reverse order of their effects, which is what the invoker guarantees.
/// Effects that lose information (stop, start, delete) keep what they
/// overwrote on a per-effect stack that the matching inverse pops.
///
/// Effects are infallible from the invoker's point of view. A failed write
/// to the output is logged and otherwise ignored; state and journal are
/// always updated.
pub struct InstanceManager<W: Write> {
    out: W,
    journal: Vec<Notification>,
    state: FleetState,

    /// `running` before each stop, most recent last
    stopped_from: Vec<bool>,
    /// `running` before each start, most recent last
    started_from: Vec<bool>,
    /// Whether each delete actually removed an instance
    deleted: Vec<bool>,
}

impl<W: Write> InstanceManager<W> {
    /// Create a manager with no instances, writing notifications to `out`
    pub fn new(out: W) -> Self {
        Self {
            out,
            journal: Vec::new(),
            state: FleetState::default(),
            stopped_from: Vec::new(),
            started_from: Vec::new(),
            deleted: Vec::new(),
        }
    }

    /// Create an instance
    pub fn run(&mut self) {
        self.state.instances = self.state.instances.saturating_add(1);
        self.notify(Notification::Created);
    }

    /// Show instances (no state change)
    pub fn list(&mut self) {
        self.notify(Notification::Listed);
    }

    /// Stop the instances
    pub fn stop(&mut self) {
        self.stopped_from.push(self.state.running);
        self.state.running = false;
        self.notify(Notification::Stopped);
    }

    /// Start the instances
    pub fn start(&mut self) {
        self.started_from.push(self.state.running);
        self.state.running = true;
        self.notify(Notification::Started);
    }

    /// Delete one instance; does nothing to the count when there are none
    pub fn delete(&mut self) {
        let removed = self.state.instances > 0;
        if removed {
            self.state.instances -= 1;
        }
        self.deleted.push(removed);
        self.notify(Notification::Deleted);
    }

    /// Undo the most recent create
    pub fn undo_run(&mut self) {
        self.state.instances = self.state.instances.saturating_sub(1);
        self.notify(Notification::CreateUndone);
    }

    /// Undo the most recent show (no state change)
    pub fn undo_list(&mut self) {
        self.notify(Notification::ListUndone);
    }

    /// Undo the most recent stop, restoring the earlier running flag
    pub fn undo_stop(&mut self) {
        if let Some(running) = self.stopped_from.pop() {
            self.state.running = running;
        }
        self.notify(Notification::StopUndone);
    }

    /// Undo the most recent start, restoring the earlier running flag
    pub fn undo_start(&mut self) {
        if let Some(running) = self.started_from.pop() {
            self.state.running = running;
        }
        self.notify(Notification::StartUndone);
    }

    /// Undo the most recent delete, bringing back the instance it removed
    pub fn undo_delete(&mut self) {
        if self.deleted.pop() == Some(true) {
            self.state.instances = self.state.instances.saturating_add(1);
        }
        self.notify(Notification::DeleteUndone);
    }

    /// Current state of the instances
    pub fn state(&self) -> FleetState {
        self.state
    }

    /// Number of instances that exist
    pub fn instance_count(&self) -> usize {
        self.state.instances
    }

    /// Whether the instances are running
    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Every notification emitted so far, oldest first
    pub fn journal(&self) -> &[Notification] {
        &self.journal
    }

    /// The output sink
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Consume the manager and return its output sink
    pub fn into_output(self) -> W {
        self.out
    }

    fn notify(&mut self, notification: Notification) {
        self.journal.push(notification);
        tracing::debug!(
            %notification,
            instances = self.state.instances,
            running = self.state.running,
            "receiver effect"
        );

        if let Err(e) = writeln!(self.out, "{}", notification).and_then(|_| self.out.flush()) {
            tracing::warn!(error = %e, %notification, "failed to write notification");
        }
    }
}

impl<W: Write> fmt::Debug for InstanceManager<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceManager")
            .field("state", &self.state)
            .field("journal", &self.journal.len())
            .finish_non_exhaustive()
    }
}
