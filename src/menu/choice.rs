// Menu numbering and rendering

use crate::command::registry::OperationRegistry;
use std::fmt::Write as _;

/// What a numeric selection means for a menu with `slot_count` action slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// Run the action in this slot (validated by the invoker, not here)
    Action(i64),
    Undo,
    Redo,
    Exit,
}

impl MenuChoice {
    /// Classify a selection
    ///
    /// `slot_count + 1` is undo, `slot_count + 2` is redo and `exit_sentinel`
    /// ends the session. Anything else is passed on as an action, including
    /// out-of-range numbers which the invoker ignores.
    pub fn from_selection(selection: i64, slot_count: usize, exit_sentinel: i64) -> Self {
        if selection == exit_sentinel {
            return MenuChoice::Exit;
        }

        let slot_count = i64::try_from(slot_count).unwrap_or(i64::MAX - 2);
        if selection == slot_count + 1 {
            MenuChoice::Undo
        } else if selection == slot_count + 2 {
            MenuChoice::Redo
        } else {
            MenuChoice::Action(selection)
        }
    }
}

/// Render the menu for a registry
///
/// Lists bound slots in order, then undo, redo and exit.
pub fn render_menu<R>(registry: &OperationRegistry<R>, exit_sentinel: i64) -> String {
    let mut menu = String::new();

    for (slot, description) in registry.bindings() {
        let _ = writeln!(menu, "{}. {}", slot, description);
    }

    let undo = registry.len() + 1;
    let _ = writeln!(menu, "{}. Undo last", undo);
    let _ = writeln!(menu, "{}. Redo last undo", undo + 1);
    let _ = writeln!(menu, "{}. Exit", exit_sentinel);

    menu
}
