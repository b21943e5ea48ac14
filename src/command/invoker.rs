// Invoker - Dispatches menu selections and manages undo/redo stacks

use crate::command::registry::{OperationHandle, OperationRegistry, Slot};
use crate::command::trait_def::ReversibleCommand;
use std::collections::VecDeque;
use std::fmt;
use std::num::NonZeroUsize;

/// Why a call to the invoker did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The selection does not name a bound slot
    UnboundSlot(i64),
    /// The done stack is empty
    NothingToUndo,
    /// The undone stack is empty
    NothingToRedo,
    /// The history entry pointed at a command that has since been replaced.
    ///
    /// The entry is dropped from history and nothing is run. `Invoker::bind`
    /// and `Invoker::unbind` purge such entries as they happen, so this only
    /// shows up if the registry was changed without going through them.
    StaleEntry(Slot),
}

/// What a single invoker call did
///
/// These are reports, not errors: every invoker operation is total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A bound command was applied from a menu selection
    Applied { slot: Slot, description: String },
    /// The most recent applied command was reverted
    Reverted { slot: Slot, description: String },
    /// The most recent reverted command was applied again
    Reapplied { slot: Slot, description: String },
    /// No command ran and the receiver was not touched
    ///
    /// For [`IgnoreReason::StaleEntry`] the dead history entry is removed.
    Ignored(IgnoreReason),
}

impl Outcome {
    /// True if the call had no effect
    pub fn is_ignored(&self) -> bool {
        matches!(self, Outcome::Ignored(_))
    }

    /// Description of the command involved, if any
    pub fn description(&self) -> Option<&str> {
        match self {
            Outcome::Applied { description, .. }
            | Outcome::Reverted { description, .. }
            | Outcome::Reapplied { description, .. } => Some(description),
            Outcome::Ignored(_) => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Applied { description, .. } => write!(f, "{}", description),
            Outcome::Reverted { description, .. } => write!(f, "Undo: {}", description),
            Outcome::Reapplied { description, .. } => write!(f, "Redo: {}", description),
            Outcome::Ignored(IgnoreReason::UnboundSlot(selection)) => {
                write!(f, "No action bound to {}", selection)
            }
            Outcome::Ignored(IgnoreReason::NothingToUndo) => write!(f, "Nothing to undo"),
            Outcome::Ignored(IgnoreReason::NothingToRedo) => write!(f, "Nothing to redo"),
            Outcome::Ignored(IgnoreReason::StaleEntry(slot)) => {
                write!(f, "Action in slot {} was replaced", slot)
            }
        }
    }
}

/// Binds menu slots to commands and keeps the undo/redo history
///
/// The Invoker maintains two stacks of handles into its registry:
/// - Done stack: commands that have been applied and can be undone
/// - Undone stack: commands that have been undone and can be redone
///
/// When an action is performed:
/// 1. Apply the bound command to the receiver
/// 2. Push its handle onto the done stack
/// 3. Clear the undone stack (history is linear)
///
/// An unbound selection does nothing at all, and in particular leaves the
/// undone stack intact.
///
/// The receiver is borrowed per call rather than owned.
pub struct Invoker<R> {
    registry: OperationRegistry<R>,

    /// Applied commands (most recent at the back)
    done: VecDeque<OperationHandle>,

    /// Reverted commands (most recent at the back)
    undone: VecDeque<OperationHandle>,

    /// Optional cap on the done stack; the oldest entry is dropped past it
    history_limit: Option<NonZeroUsize>,
}

impl<R> Invoker<R> {
    /// Create an Invoker with an empty default-size registry
    pub fn new() -> Self {
        Self::with_registry(OperationRegistry::new())
    }

    /// Create an Invoker around an already populated registry
    pub fn with_registry(registry: OperationRegistry<R>) -> Self {
        Self {
            registry,
            done: VecDeque::new(),
            undone: VecDeque::new(),
            history_limit: None,
        }
    }

    /// Cap the number of commands that can be undone
    ///
    /// `None` keeps the full history. Shrinking the limit trims the oldest
    /// entries right away.
    pub fn set_history_limit(&mut self, limit: Option<NonZeroUsize>) {
        self.history_limit = limit;
        self.trim_history();
    }

    /// The current history limit
    pub fn history_limit(&self) -> Option<NonZeroUsize> {
        self.history_limit
    }

    /// Bind a command to a slot
    ///
    /// History entries that referred to a command previously bound to the
    /// same slot are discarded along with it.
    pub fn bind(&mut self, slot: Slot, command: Box<dyn ReversibleCommand<R>>) {
        self.registry.bind(slot, command);
        self.purge_stale();
    }

    /// Release the command bound to a slot
    pub fn unbind(&mut self, slot: Slot) -> Option<Box<dyn ReversibleCommand<R>>> {
        let released = self.registry.unbind(slot);
        if released.is_some() {
            self.purge_stale();
        }
        released
    }

    /// Read-only access to the registry
    pub fn registry(&self) -> &OperationRegistry<R> {
        &self.registry
    }

    /// Apply the command bound to `selection` and record it
    ///
    /// Selections that are zero, negative, out of range or unbound are a
    /// silent no-op and do not touch either stack.
    pub fn perform_action(&mut self, selection: i64, receiver: &mut R) -> Outcome {
        let Some((handle, command)) = self.registry.lookup(selection) else {
            tracing::debug!(selection, "ignoring unbound selection");
            return Outcome::Ignored(IgnoreReason::UnboundSlot(selection));
        };

        command.apply(receiver);
        let description = command.description();

        self.done.push_back(handle);

        // A new action invalidates the redo chain
        self.undone.clear();

        self.trim_history();

        tracing::info!(slot = handle.slot().get(), %description, "applied");
        Outcome::Applied {
            slot: handle.slot(),
            description,
        }
    }

    /// Revert the most recently applied command
    ///
    /// Pops the top of the done stack, reverts it, and pushes it onto the
    /// undone stack. No-op if there is nothing to undo.
    pub fn undo(&mut self, receiver: &mut R) -> Outcome {
        let Some(handle) = self.done.pop_back() else {
            tracing::debug!("nothing to undo");
            return Outcome::Ignored(IgnoreReason::NothingToUndo);
        };

        let Some(command) = self.registry.resolve(handle) else {
            tracing::warn!(slot = handle.slot().get(), "dropping stale history entry");
            return Outcome::Ignored(IgnoreReason::StaleEntry(handle.slot()));
        };

        command.revert(receiver);
        let description = command.description();

        self.undone.push_back(handle);

        tracing::info!(slot = handle.slot().get(), %description, "reverted");
        Outcome::Reverted {
            slot: handle.slot(),
            description,
        }
    }

    /// Apply again the most recently reverted command
    ///
    /// Pops the top of the undone stack, re-runs its forward effect, and
    /// pushes it back onto the done stack. No-op if there is nothing to redo.
    pub fn redo(&mut self, receiver: &mut R) -> Outcome {
        let Some(handle) = self.undone.pop_back() else {
            tracing::debug!("nothing to redo");
            return Outcome::Ignored(IgnoreReason::NothingToRedo);
        };

        let Some(command) = self.registry.resolve(handle) else {
            tracing::warn!(slot = handle.slot().get(), "dropping stale history entry");
            return Outcome::Ignored(IgnoreReason::StaleEntry(handle.slot()));
        };

        command.apply(receiver);
        let description = command.description();

        self.done.push_back(handle);
        self.trim_history();

        tracing::info!(slot = handle.slot().get(), %description, "reapplied");
        Outcome::Reapplied {
            slot: handle.slot(),
            description,
        }
    }

    /// Check if there are commands that can be undone
    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    /// Check if there are commands that can be redone
    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Get a description of the command that would be undone
    pub fn undo_description(&self) -> Option<String> {
        self.done.back().and_then(|&h| self.describe(h))
    }

    /// Get a description of the command that would be redone
    pub fn redo_description(&self) -> Option<String> {
        self.undone.back().and_then(|&h| self.describe(h))
    }

    /// Number of commands in the done stack
    pub fn undo_count(&self) -> usize {
        self.done.len()
    }

    /// Number of commands in the undone stack
    pub fn redo_count(&self) -> usize {
        self.undone.len()
    }

    /// Done stack, top first
    pub fn done_slots(&self) -> Vec<Slot> {
        self.done.iter().rev().map(|h| h.slot()).collect()
    }

    /// Undone stack, top first
    pub fn undone_slots(&self) -> Vec<Slot> {
        self.undone.iter().rev().map(|h| h.slot()).collect()
    }

    /// Descriptions of the done stack, top first
    pub fn done_descriptions(&self) -> Vec<String> {
        self.done.iter().rev().filter_map(|&h| self.describe(h)).collect()
    }

    /// Descriptions of the undone stack, top first
    pub fn undone_descriptions(&self) -> Vec<String> {
        self.undone.iter().rev().filter_map(|&h| self.describe(h)).collect()
    }

    /// Forget all history without touching the receiver
    pub fn clear_history(&mut self) {
        self.done.clear();
        self.undone.clear();
    }

    fn describe(&self, handle: OperationHandle) -> Option<String> {
        self.registry.resolve(handle).map(|c| c.description())
    }

    fn trim_history(&mut self) {
        if let Some(limit) = self.history_limit {
            while self.done.len() > limit.get() {
                self.done.pop_front();
            }
        }
    }

    fn purge_stale(&mut self) {
        let registry = &self.registry;
        self.done.retain(|&h| registry.is_live(h));
        self.undone.retain(|&h| registry.is_live(h));
    }
}

impl<R> Default for Invoker<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for Invoker<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invoker")
            .field("registry", &self.registry)
            .field("done", &self.done.len())
            .field("undone", &self.undone.len())
            .field("history_limit", &self.history_limit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::trait_def::Operation;

    // Receiver that records every effect it sees
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    macro_rules! recorded_op {
        ($name:literal) => {
            Box::new(Operation::new(
                $name,
                |r: &mut Recorder| r.events.push(concat!("apply ", $name).to_string()),
                |r: &mut Recorder| r.events.push(concat!("revert ", $name).to_string()),
            ))
        };
    }

    fn slot(n: usize) -> Slot {
        Slot::new(n).unwrap()
    }

    fn create_test_invoker() -> Invoker<Recorder> {
        let mut invoker = Invoker::new();
        invoker.bind(slot(1), recorded_op!("A"));
        invoker.bind(slot(2), recorded_op!("B"));
        invoker.bind(slot(3), recorded_op!("C"));
        invoker.bind(slot(4), recorded_op!("D"));
        invoker.bind(slot(5), recorded_op!("E"));
        invoker
    }

    #[test]
    fn test_perform_action() {
        let mut invoker = create_test_invoker();
        let mut recorder = Recorder::default();

        let outcome = invoker.perform_action(2, &mut recorder);

        assert_eq!(
            outcome,
            Outcome::Applied {
                slot: slot(2),
                description: "B".into()
            }
        );
        assert_eq!(recorder.events, vec!["apply B"]);
        assert_eq!(invoker.undo_count(), 1);
        assert_eq!(invoker.redo_count(), 0);
        assert!(invoker.can_undo());
        assert!(!invoker.can_redo());
    }

    #[test]
    fn test_undo() {
        let mut invoker = create_test_invoker();
        let mut recorder = Recorder::default();

        invoker.perform_action(3, &mut recorder);
        let outcome = invoker.undo(&mut recorder);

        assert_eq!(outcome.description(), Some("C"));
        assert_eq!(outcome.to_string(), "Undo: C");
        assert_eq!(recorder.events, vec!["apply C", "revert C"]);
        assert_eq!(invoker.undo_count(), 0);
        assert_eq!(invoker.redo_count(), 1);
    }

    #[test]
    fn test_redo() {
        let mut invoker = create_test_invoker();
        let mut recorder = Recorder::default();

        invoker.perform_action(3, &mut recorder);
        invoker.undo(&mut recorder);
        let outcome = invoker.redo(&mut recorder);

        assert_eq!(outcome.to_string(), "Redo: C");
        assert_eq!(recorder.events, vec!["apply C", "revert C", "apply C"]);
        assert_eq!(invoker.undo_count(), 1);
        assert_eq!(invoker.redo_count(), 0);
    }

    #[test]
    fn test_undone_cleared_on_new_action() {
        let mut invoker = create_test_invoker();
        let mut recorder = Recorder::default();

        invoker.perform_action(1, &mut recorder);
        invoker.undo(&mut recorder);
        assert!(invoker.can_redo());

        invoker.perform_action(2, &mut recorder);

        assert!(!invoker.can_redo());
        assert_eq!(invoker.redo_count(), 0);
    }

    #[test]
    fn test_unbound_selection_keeps_undone() {
        let mut invoker = create_test_invoker();
        let mut recorder = Recorder::default();

        invoker.perform_action(1, &mut recorder);
        invoker.undo(&mut recorder);

        for selection in [0, -1, 6, 99] {
            let outcome = invoker.perform_action(selection, &mut recorder);
            assert_eq!(outcome, Outcome::Ignored(IgnoreReason::UnboundSlot(selection)));
        }

        assert_eq!(invoker.redo_count(), 1);
        assert_eq!(invoker.undo_count(), 0);
        assert_eq!(recorder.events, vec!["apply A", "revert A"]);
    }

    #[test]
    fn test_undo_with_empty_stack() {
        let mut invoker = create_test_invoker();
        let mut recorder = Recorder::default();

        assert_eq!(
            invoker.undo(&mut recorder),
            Outcome::Ignored(IgnoreReason::NothingToUndo)
        );
        assert!(recorder.events.is_empty());
    }

    #[test]
    fn test_redo_with_empty_stack() {
        let mut invoker = create_test_invoker();
        let mut recorder = Recorder::default();

        invoker.perform_action(1, &mut recorder);
        assert_eq!(
            invoker.redo(&mut recorder),
            Outcome::Ignored(IgnoreReason::NothingToRedo)
        );
        assert_eq!(recorder.events, vec!["apply A"]);
        assert_eq!(invoker.undo_count(), 1);
    }

    #[test]
    fn test_interleaved_scenario() {
        let mut invoker = create_test_invoker();
        let mut recorder = Recorder::default();

        invoker.perform_action(2, &mut recorder);
        invoker.perform_action(4, &mut recorder);
        invoker.undo(&mut recorder);
        assert_eq!(invoker.done_descriptions(), vec!["B"]);
        assert_eq!(invoker.undone_descriptions(), vec!["D"]);

        invoker.perform_action(1, &mut recorder);
        assert!(invoker.undone_descriptions().is_empty());

        assert!(invoker.redo(&mut recorder).is_ignored());
        assert_eq!(invoker.done_descriptions(), vec!["A", "B"]);
        assert_eq!(
            recorder.events,
            vec!["apply B", "apply D", "revert D", "apply A"]
        );
    }

    #[test]
    fn test_undo_redo_are_lifo() {
        let mut invoker = create_test_invoker();
        let mut recorder = Recorder::default();

        for selection in [1, 2, 3] {
            invoker.perform_action(selection, &mut recorder);
        }
        invoker.undo(&mut recorder);
        invoker.undo(&mut recorder);
        invoker.redo(&mut recorder);

        assert_eq!(invoker.done_slots(), vec![slot(2), slot(1)]);
        assert_eq!(invoker.undone_slots(), vec![slot(3)]);
        assert_eq!(
            recorder.events[3..],
            ["revert C", "revert B", "apply B"]
        );
    }

    #[test]
    fn test_same_slot_can_repeat_in_history() {
        let mut invoker = create_test_invoker();
        let mut recorder = Recorder::default();

        invoker.perform_action(5, &mut recorder);
        invoker.perform_action(5, &mut recorder);

        assert_eq!(invoker.done_descriptions(), vec!["E", "E"]);
        invoker.undo(&mut recorder);
        assert_eq!(invoker.undo_count(), 1);
        assert_eq!(invoker.redo_count(), 1);
    }

    #[test]
    fn test_descriptions() {
        let mut invoker = create_test_invoker();
        let mut recorder = Recorder::default();

        assert_eq!(invoker.undo_description(), None);
        invoker.perform_action(4, &mut recorder);
        assert_eq!(invoker.undo_description(), Some("D".to_string()));
        invoker.undo(&mut recorder);
        assert_eq!(invoker.undo_description(), None);
        assert_eq!(invoker.redo_description(), Some("D".to_string()));
    }

    #[test]
    fn test_history_limit() {
        let mut invoker = create_test_invoker();
        let mut recorder = Recorder::default();
        invoker.set_history_limit(NonZeroUsize::new(3));

        for selection in 1..=5 {
            invoker.perform_action(selection, &mut recorder);
        }

        // Should only keep the last 3
        assert_eq!(invoker.done_descriptions(), vec!["E", "D", "C"]);
    }

    #[test]
    fn test_shrinking_history_limit_trims() {
        let mut invoker = create_test_invoker();
        let mut recorder = Recorder::default();

        for selection in 1..=4 {
            invoker.perform_action(selection, &mut recorder);
        }
        invoker.set_history_limit(NonZeroUsize::new(1));

        assert_eq!(invoker.done_descriptions(), vec!["D"]);
    }

    #[test]
    fn test_rebind_purges_history_of_replaced_command() {
        let mut invoker = create_test_invoker();
        let mut recorder = Recorder::default();

        invoker.perform_action(1, &mut recorder);
        invoker.perform_action(2, &mut recorder);
        invoker.perform_action(1, &mut recorder);
        invoker.undo(&mut recorder);

        invoker.bind(slot(1), recorded_op!("Z"));

        assert_eq!(invoker.done_descriptions(), vec!["B"]);
        assert_eq!(invoker.redo_count(), 0);

        invoker.perform_action(1, &mut recorder);
        assert_eq!(recorder.events.last().map(String::as_str), Some("apply Z"));
    }

    #[test]
    fn test_undo_and_redo_drop_entries_of_replaced_commands() {
        let mut invoker = create_test_invoker();
        let mut recorder = Recorder::default();

        invoker.perform_action(1, &mut recorder);
        invoker.perform_action(2, &mut recorder);
        invoker.undo(&mut recorder);

        // Rebind behind the invoker's back so no purge runs
        invoker.registry.bind(slot(1), recorded_op!("Y"));
        invoker.registry.bind(slot(2), recorded_op!("X"));

        assert_eq!(
            invoker.redo(&mut recorder),
            Outcome::Ignored(IgnoreReason::StaleEntry(slot(2)))
        );
        assert_eq!(
            invoker.undo(&mut recorder),
            Outcome::Ignored(IgnoreReason::StaleEntry(slot(1)))
        );

        assert!(!invoker.can_undo());
        assert!(!invoker.can_redo());
        assert_eq!(recorder.events, vec!["apply A", "apply B", "revert B"]);
        assert_eq!(
            invoker.undo(&mut recorder),
            Outcome::Ignored(IgnoreReason::NothingToUndo)
        );
    }

    #[test]
    fn test_unbind_makes_slot_a_no_op() {
        let mut invoker = create_test_invoker();
        let mut recorder = Recorder::default();

        invoker.perform_action(3, &mut recorder);
        assert!(invoker.unbind(slot(3)).is_some());

        assert!(!invoker.can_undo());
        assert!(invoker.perform_action(3, &mut recorder).is_ignored());
    }

    #[test]
    fn test_clear_history() {
        let mut invoker = create_test_invoker();
        let mut recorder = Recorder::default();

        invoker.perform_action(1, &mut recorder);
        invoker.perform_action(2, &mut recorder);
        invoker.undo(&mut recorder);
        invoker.clear_history();

        assert!(!invoker.can_undo());
        assert!(!invoker.can_redo());
        assert_eq!(recorder.events.len(), 3);
    }
}
