use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use super::connection::{Direction, Link};
use crate::command::CommandBatch;
use crate::editor::{Editor, EditorId, Listener};

type Deferred = Box<dyn FnOnce()>;

/// Delivery state shared by both directions of one connection
pub(super) struct Hop<C> {
    /// Target and commands of the batch being delivered right now
    delivering: RefCell<Option<(EditorId, Vec<C>)>>,
    /// Edits made while a delivery was in progress
    deferred: RefCell<VecDeque<Deferred>>,
}

impl<C: PartialEq> Hop<C> {
    pub(super) fn new() -> Self {
        Self {
            delivering: RefCell::new(None),
            deferred: RefCell::new(VecDeque::new()),
        }
    }

    fn in_flight(&self) -> bool {
        self.delivering.borrow().is_some()
    }

    /// Whether `batch`, emitted by `source`, replays the delivery in progress
    fn is_echo(&self, source: EditorId, batch: &CommandBatch<C>) -> bool {
        match &*self.delivering.borrow() {
            Some((target, commands)) => *target == source && *commands == batch.commands,
            None => false,
        }
    }

    fn begin(&self, target: EditorId, commands: Vec<C>) -> DeliveryGuard<'_, C> {
        *self.delivering.borrow_mut() = Some((target, commands));
        DeliveryGuard(&self.delivering)
    }

    fn defer(&self, task: Deferred) {
        self.deferred.borrow_mut().push_back(task);
    }

    fn next_deferred(&self) -> Option<Deferred> {
        self.deferred.borrow_mut().pop_front()
    }
}

struct DeliveryGuard<'a, C>(&'a RefCell<Option<(EditorId, Vec<C>)>>);

impl<C> Drop for DeliveryGuard<'_, C> {
    fn drop(&mut self) {
        *self.0.borrow_mut() = None;
    }
}

/// Replays one editor's batches into another
pub(super) struct Forwarder<T: Editor> {
    source: EditorId,
    target: Weak<T>,
    label: String,
    direction: Direction,
    link: Rc<Link>,
    hop: Rc<Hop<T::Command>>,
}

impl<T: Editor + 'static> Forwarder<T> {
    pub(super) fn new(
        source: EditorId,
        target: Weak<T>,
        label: String,
        direction: Direction,
        link: Rc<Link>,
        hop: Rc<Hop<T::Command>>,
    ) -> Rc<Self> {
        Rc::new(Self {
            source,
            target,
            label,
            direction,
            link,
            hop,
        })
    }

    pub(super) fn into_listener(self: Rc<Self>) -> Listener<T::Command> {
        Box::new(move |batch: &CommandBatch<T::Command>| self.on_batch(batch))
    }

    fn on_batch(self: &Rc<Self>, batch: &CommandBatch<T::Command>) {
        let Some(target) = self.target.upgrade() else {
            log::debug!("{}: target editor is gone, batch not forwarded", self.label);
            return;
        };

        if batch.origin == target.id() || self.hop.is_echo(self.source, batch) {
            log::trace!("{}: dropped echo of batch from {}", self.label, batch.origin);
            self.link.record_dropped(self.direction);
            return;
        }

        if self.hop.in_flight() {
            // A new edit made mid-delivery goes out once the delivery is done
            let this = Rc::clone(self);
            let batch = batch.clone();
            self.hop.defer(Box::new(move || this.on_batch(&batch)));
            return;
        }

        log::debug!("{} pull", self.label);
        {
            let _delivery = self.hop.begin(target.id(), batch.commands.clone());
            target.next(batch.clone());
        }
        self.link.record_forwarded(self.direction);

        while let Some(task) = self.hop.next_deferred() {
            task();
        }
    }
}
