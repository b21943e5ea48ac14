// OperationRegistry - Slot-addressed arena of bound commands

use crate::command::trait_def::ReversibleCommand;
use std::fmt;
use std::num::NonZeroUsize;

/// Number of slots a fresh registry starts with
pub const DEFAULT_SLOT_COUNT: usize = 5;

/// A 1-based menu slot
///
/// Slot 0 cannot be represented, so binding never has to reject it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot(NonZeroUsize);

impl Slot {
    /// Create a slot from a 1-based position, `None` for 0
    pub const fn new(position: usize) -> Option<Self> {
        match NonZeroUsize::new(position) {
            Some(position) => Some(Self(position)),
            None => None,
        }
    }

    /// Convert a raw menu selection into a slot
    ///
    /// Returns `None` for zero, negative values and anything that does not fit
    /// in `usize`.
    pub fn from_selection(selection: i64) -> Option<Self> {
        usize::try_from(selection).ok().and_then(Self::new)
    }

    /// The 1-based position of this slot
    pub const fn get(self) -> usize {
        self.0.get()
    }

    fn index(self) -> usize {
        self.0.get() - 1
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-owning reference to a bound command
///
/// Carries the generation of the binding it was taken from, so a handle to a
/// command that has since been replaced no longer resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationHandle {
    slot: Slot,
    generation: u32,
}

impl OperationHandle {
    /// The slot this handle points into
    pub fn slot(&self) -> Slot {
        self.slot
    }
}

struct SlotEntry<R> {
    generation: u32,
    command: Option<Box<dyn ReversibleCommand<R>>>,
}

impl<R> SlotEntry<R> {
    fn empty() -> Self {
        Self {
            generation: 0,
            command: None,
        }
    }
}

/// Fixed-size, position-addressable mapping from slot to command
///
/// The registry owns every bound command. History stacks refer to them
/// through [`OperationHandle`]s only.
pub struct OperationRegistry<R> {
    slots: Vec<SlotEntry<R>>,
}

impl<R> OperationRegistry<R> {
    /// Create a registry with the default number of empty slots
    pub fn new() -> Self {
        Self::with_slots(DEFAULT_SLOT_COUNT)
    }

    /// Create a registry with `count` empty slots
    pub fn with_slots(count: usize) -> Self {
        let mut slots = Vec::with_capacity(count);
        slots.resize_with(count, SlotEntry::empty);
        Self { slots }
    }

    /// Bind a command to a slot, growing the registry if needed
    ///
    /// Any command previously bound to the slot is dropped before the new one
    /// is stored. Intermediate slots created by growth stay unbound.
    pub fn bind(&mut self, slot: Slot, command: Box<dyn ReversibleCommand<R>>) -> OperationHandle {
        if self.slots.len() < slot.get() {
            self.slots.resize_with(slot.get(), SlotEntry::empty);
        }

        let entry = &mut self.slots[slot.index()];
        // Release the old command before taking ownership of the new one
        entry.command = None;
        entry.generation = entry.generation.wrapping_add(1);
        entry.command = Some(command);

        OperationHandle {
            slot,
            generation: entry.generation,
        }
    }

    /// Release the command bound to a slot
    ///
    /// Returns the released command, or `None` if the slot was out of range or
    /// already unbound.
    pub fn unbind(&mut self, slot: Slot) -> Option<Box<dyn ReversibleCommand<R>>> {
        let entry = self.slots.get_mut(slot.index())?;
        let command = entry.command.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        Some(command)
    }

    /// Look up a command by raw menu selection
    ///
    /// Returns `None` for 0, negative, out-of-range or unbound selections.
    pub fn get(&self, selection: i64) -> Option<&dyn ReversibleCommand<R>> {
        self.lookup(selection).map(|(_, command)| command)
    }

    /// Look up a command and the handle of its current binding
    pub fn lookup(&self, selection: i64) -> Option<(OperationHandle, &dyn ReversibleCommand<R>)> {
        let slot = Slot::from_selection(selection)?;
        let entry = self.slots.get(slot.index())?;
        let command = entry.command.as_deref()?;
        let handle = OperationHandle {
            slot,
            generation: entry.generation,
        };
        Some((handle, command))
    }

    /// Resolve a handle back to its command
    ///
    /// Returns `None` if the slot has been rebound or unbound since the
    /// handle was taken.
    pub fn resolve(&self, handle: OperationHandle) -> Option<&dyn ReversibleCommand<R>> {
        let entry = self.slots.get(handle.slot.index())?;
        if entry.generation != handle.generation {
            return None;
        }
        entry.command.as_deref()
    }

    /// Check whether a handle still refers to a live binding
    pub fn is_live(&self, handle: OperationHandle) -> bool {
        self.resolve(handle).is_some()
    }

    /// Number of slots, bound or not
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if the registry has no slots at all
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots that currently hold a command
    pub fn bound_count(&self) -> usize {
        self.slots.iter().filter(|e| e.command.is_some()).count()
    }

    /// Iterate bound slots in order with their descriptions
    pub fn bindings(&self) -> impl Iterator<Item = (Slot, String)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, entry)| {
            let command = entry.command.as_deref()?;
            let slot = Slot::new(index + 1)?;
            Some((slot, command.description()))
        })
    }
}

impl<R> Default for OperationRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for OperationRegistry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationRegistry")
            .field("slots", &self.slots.len())
            .field("bound", &self.bound_count())
            .finish()
    }
}
