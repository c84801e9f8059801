#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use erd_relay::editor::Listener;
use erd_relay::{CommandBatch, Editor, EditorId, EventBus, Subscription};

/// Every call the relay made on a mock editor
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Subscribe,
    Next(CommandBatch<String>),
    Blur,
}

/// What a mock editor does with a batch it receives through `next`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Echo {
    /// Applies the batch without emitting
    Silent,
    /// Re-emits the batch with its original origin
    PreserveOrigin,
    /// Re-emits the commands as if they were local edits
    AsLocal,
    /// Re-emits the batch, then makes a new local edit derived from it
    FollowUp(&'static str),
}

#[derive(Debug)]
pub struct MockEditor {
    id: EditorId,
    echo: Echo,
    bus: EventBus<CommandBatch<String>>,
    calls: RefCell<Vec<Call>>,
}

impl MockEditor {
    pub fn new(echo: Echo) -> Rc<Self> {
        Rc::new(Self {
            id: EditorId::new(),
            echo,
            bus: EventBus::new(),
            calls: RefCell::new(Vec::new()),
        })
    }

    /// Simulates a local edit producing the given commands
    pub fn emit(&self, commands: &[&str]) {
        let commands = commands.iter().map(|c| c.to_string()).collect();
        self.bus.emit(&CommandBatch::new(self.id, commands));
    }

    /// Emits a batch tagged with someone else's origin, as an editor does
    /// when it re-emits a replayed batch
    pub fn emit_as(&self, origin: EditorId, commands: &[&str]) {
        let commands = commands.iter().map(|c| c.to_string()).collect();
        self.bus.emit(&CommandBatch::new(origin, commands));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Commands received through `next`, flattened in arrival order
    pub fn received(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Next(batch) => Some(batch.commands.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn next_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, Call::Next(_)))
            .count()
    }

    pub fn listener_count(&self) -> usize {
        self.bus.listener_count()
    }
}

impl Editor for MockEditor {
    type Command = String;

    fn id(&self) -> EditorId {
        self.id
    }

    fn subscribe(&self, listener: Listener<String>) -> Subscription {
        self.calls.borrow_mut().push(Call::Subscribe);
        self.bus.subscribe(listener)
    }

    fn next(&self, batch: CommandBatch<String>) {
        self.calls.borrow_mut().push(Call::Next(batch.clone()));
        match self.echo {
            Echo::Silent => {}
            Echo::PreserveOrigin => self.bus.emit(&batch),
            Echo::AsLocal => self.bus.emit(&CommandBatch::new(self.id, batch.commands)),
            Echo::FollowUp(command) => {
                self.bus.emit(&batch);
                self.emit(&[command]);
            }
        }
    }

    fn blur(&self) {
        self.calls.borrow_mut().push(Call::Blur);
    }
}
