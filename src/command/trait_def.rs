// ReversibleCommand trait and the parameterized Operation

use std::borrow::Cow;
use std::fmt;

/// A forward or inverse effect on a receiver.
///
/// Plain function pointers, so receiver methods such as `InstanceManager::run`
/// can be bound directly.
pub type Effect<R> = fn(&mut R);

/// Trait for commands that can be applied to a receiver and reverted
///
/// The registry stores commands as `Box<dyn ReversibleCommand<R>>`, so both the
/// stock [`Operation`] and hand-written commands can be bound to a menu slot.
///
/// Commands are immutable once bound: `apply` and `revert` take `&self`.
/// Redo calls `apply` again on the very same command, so a command's forward
/// effect must be safe to replay after a `revert`.
///
/// # Example
/// ```
/// use instance_menu::command::trait_def::ReversibleCommand;
///
/// struct Counter(i32);
///
/// struct Increment;
///
/// impl ReversibleCommand<Counter> for Increment {
///     fn apply(&self, counter: &mut Counter) {
///         counter.0 += 1;
///     }
///
///     fn revert(&self, counter: &mut Counter) {
///         counter.0 -= 1;
///     }
///
///     fn description(&self) -> String {
///         "Increment".to_string()
///     }
/// }
///
/// let mut counter = Counter(0);
/// Increment.apply(&mut counter);
/// Increment.revert(&mut counter);
/// assert_eq!(counter.0, 0);
/// ```
pub trait ReversibleCommand<R> {
    /// Run the forward effect against the receiver
    fn apply(&self, receiver: &mut R);

    /// Run the inverse effect against the receiver
    fn revert(&self, receiver: &mut R);

    /// Get a human-readable description of the command
    ///
    /// Used for menu entries and undo/redo reports (e.g., "Undo: Stop Instances").
    fn description(&self) -> String;
}

/// A reversible operation built from two bound effects
///
/// This is the one command type the menu needs: every action is a forward
/// effect paired with its inverse on the same receiver.
pub struct Operation<R> {
    description: Cow<'static, str>,
    forward: Effect<R>,
    inverse: Effect<R>,
}

impl<R> Operation<R> {
    /// Create a new operation
    ///
    /// # Arguments
    /// * `description` - Menu label for the operation
    /// * `forward` - Effect run on apply and redo
    /// * `inverse` - Effect run on undo
    pub fn new(
        description: impl Into<Cow<'static, str>>,
        forward: Effect<R>,
        inverse: Effect<R>,
    ) -> Self {
        Self {
            description: description.into(),
            forward,
            inverse,
        }
    }
}

impl<R> ReversibleCommand<R> for Operation<R> {
    fn apply(&self, receiver: &mut R) {
        (self.forward)(receiver);
    }

    fn revert(&self, receiver: &mut R) {
        (self.inverse)(receiver);
    }

    fn description(&self) -> String {
        self.description.to_string()
    }
}

impl<R> fmt::Debug for Operation<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
