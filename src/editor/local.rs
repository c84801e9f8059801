use std::cell::{Cell, RefCell};

use super::{Editor, EditorId, Listener};
use crate::command::{Command, CommandBatch};
use crate::event::{EventBus, Subscription};

/// An in-memory editor that keeps an ordered log of every command applied to
/// it and emits a batch each time the log changes.
#[derive(Debug)]
pub struct LocalEditor {
    id: EditorId,
    log: RefCell<Vec<Command>>,
    bus: EventBus<CommandBatch<Command>>,
    focused: Cell<bool>,
}

impl Default for LocalEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalEditor {
    pub fn new() -> Self {
        Self {
            id: EditorId::new(),
            log: RefCell::new(Vec::new()),
            bus: EventBus::new(),
            focused: Cell::new(true),
        }
    }

    /// Applies a local edit and emits it with this editor as origin
    pub fn dispatch(&self, commands: Vec<Command>) {
        if commands.is_empty() {
            return;
        }
        self.log.borrow_mut().extend(commands.iter().cloned());
        self.bus.emit(&CommandBatch::new(self.id, commands));
    }

    /// Snapshot of the applied commands, oldest first
    pub fn commands(&self) -> Vec<Command> {
        self.log.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }

    pub fn focus(&self) {
        self.focused.set(true);
    }

    pub fn is_focused(&self) -> bool {
        self.focused.get()
    }

    pub fn listener_count(&self) -> usize {
        self.bus.listener_count()
    }
}

impl Editor for LocalEditor {
    type Command = Command;

    fn id(&self) -> EditorId {
        self.id
    }

    fn subscribe(&self, listener: Listener<Command>) -> Subscription {
        self.bus.subscribe(listener)
    }

    fn next(&self, batch: CommandBatch<Command>) {
        if batch.is_empty() {
            return;
        }
        log::trace!(
            "editor {} applying {} command(s) from {}",
            self.id,
            batch.len(),
            batch.origin
        );
        self.log.borrow_mut().extend(batch.iter().cloned());
        self.bus.emit(&batch);
    }

    fn blur(&self) {
        self.focused.set(false);
    }
}
