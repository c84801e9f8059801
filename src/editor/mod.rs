//! The boundary between the relay and the editor instances it connects.

mod id;
mod local;

use std::fmt;

use crate::command::CommandBatch;
use crate::event::{self, Subscription};

pub use id::EditorId;
pub use local::LocalEditor;

/// Listener registered on an editor's outgoing command stream
pub type Listener<C> = event::Listener<CommandBatch<C>>;

/// An editor instance as seen from the outside.
///
/// Instances are owned by the host and shared through `Rc`, so every method
/// takes `&self` and implementations use interior mutability.
pub trait Editor {
    /// The command type emitted and accepted by this editor. Equality is
    /// what lets the relay tell an echo from a new edit.
    type Command: Clone + PartialEq + fmt::Debug + 'static;

    fn id(&self) -> EditorId;

    /// Registers a listener invoked once per emitted batch, in emission order
    fn subscribe(&self, listener: Listener<Self::Command>) -> Subscription;

    /// Injects a batch as if it had been produced locally.
    ///
    /// Must be safe to call from inside another instance's dispatch. When the
    /// editor re-emits the batch it keeps `batch.origin`.
    fn next(&self, batch: CommandBatch<Self::Command>);

    /// Releases input focus
    fn blur(&self);
}
