// Concrete instance actions and menu setup

use crate::command::invoker::Invoker;
use crate::command::registry::Slot;
use crate::command::trait_def::Operation;
use crate::instance::InstanceManager;
use std::io::Write;

const SHOW_SLOT: Slot = menu_slot(1);
const CREATE_SLOT: Slot = menu_slot(2);
const STOP_SLOT: Slot = menu_slot(3);
const START_SLOT: Slot = menu_slot(4);
const DELETE_SLOT: Slot = menu_slot(5);

// Evaluated at compile time, so a zero position fails the build
const fn menu_slot(position: usize) -> Slot {
    match Slot::new(position) {
        Some(slot) => slot,
        None => panic!("menu slots start at 1"),
    }
}

/// The actions the instance menu offers, in menu order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstanceAction {
    Show,
    Create,
    Stop,
    Start,
    Delete,
}

impl InstanceAction {
    /// All actions in slot order
    pub const ALL: [InstanceAction; 5] = [
        InstanceAction::Show,
        InstanceAction::Create,
        InstanceAction::Stop,
        InstanceAction::Start,
        InstanceAction::Delete,
    ];

    /// Menu label
    pub fn label(self) -> &'static str {
        match self {
            InstanceAction::Show => "Show Instances",
            InstanceAction::Create => "Create Instances",
            InstanceAction::Stop => "Stop Instances",
            InstanceAction::Start => "Start Instances",
            InstanceAction::Delete => "Delete Instances",
        }
    }

    /// The slot this action is bound to by [`setup_menu`]
    pub const fn slot(self) -> Slot {
        match self {
            InstanceAction::Show => SHOW_SLOT,
            InstanceAction::Create => CREATE_SLOT,
            InstanceAction::Stop => STOP_SLOT,
            InstanceAction::Start => START_SLOT,
            InstanceAction::Delete => DELETE_SLOT,
        }
    }

    /// Build the reversible operation for this action
    pub fn operation<W: Write>(self) -> Operation<InstanceManager<W>> {
        let (forward, inverse): (fn(&mut InstanceManager<W>), fn(&mut InstanceManager<W>)) =
            match self {
                InstanceAction::Show => (InstanceManager::list, InstanceManager::undo_list),
                InstanceAction::Create => (InstanceManager::run, InstanceManager::undo_run),
                InstanceAction::Stop => (InstanceManager::stop, InstanceManager::undo_stop),
                InstanceAction::Start => (InstanceManager::start, InstanceManager::undo_start),
                InstanceAction::Delete => (InstanceManager::delete, InstanceManager::undo_delete),
            };
        Operation::new(self.label(), forward, inverse)
    }
}

/// Bind every [`InstanceAction`] to its slot
pub fn setup_menu<W: Write + 'static>(invoker: &mut Invoker<InstanceManager<W>>) {
    for action in InstanceAction::ALL {
        invoker.bind(action.slot(), Box::new(action.operation()));
    }
}
