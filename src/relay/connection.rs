use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use super::{PairKey, registry};
use crate::editor::EditorId;
use crate::event::Subscription;

/// Which way a batch travelled through the relay
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    PrimaryToSecondary,
    SecondaryToPrimary,
}

/// Counters for one direction of a connection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirectionStats {
    /// Batches handed to the target's `next`
    pub forwarded: u64,
    /// Batches recognised as echoes and not forwarded
    pub dropped: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RelayStats {
    pub primary_to_secondary: DirectionStats,
    pub secondary_to_primary: DirectionStats,
}

impl RelayStats {
    pub fn direction(&self, direction: Direction) -> DirectionStats {
        match direction {
            Direction::PrimaryToSecondary => self.primary_to_secondary,
            Direction::SecondaryToPrimary => self.secondary_to_primary,
        }
    }

    fn direction_mut(&mut self, direction: Direction) -> &mut DirectionStats {
        match direction {
            Direction::PrimaryToSecondary => &mut self.primary_to_secondary,
            Direction::SecondaryToPrimary => &mut self.secondary_to_primary,
        }
    }
}

/// Counters shared by the two listeners of one connection
#[derive(Debug, Default)]
pub(super) struct Link {
    stats: Cell<RelayStats>,
}

impl Link {
    pub(super) fn record_forwarded(&self, direction: Direction) {
        let mut stats = self.stats.get();
        stats.direction_mut(direction).forwarded += 1;
        self.stats.set(stats);
    }

    pub(super) fn record_dropped(&self, direction: Direction) {
        let mut stats = self.stats.get();
        stats.direction_mut(direction).dropped += 1;
        self.stats.set(stats);
    }
}

/// A live pair of relay listeners.
///
/// Dropping the connection (or calling [`Connection::disconnect`]) removes
/// both listeners and frees the pair to be connected again by any relay.
/// [`Connection::detach`] keeps the relay running for the rest of the
/// process instead.
#[must_use = "dropping a Connection disconnects the relay; call `detach` to keep it running"]
pub struct Connection {
    primary: EditorId,
    secondary: EditorId,
    subscriptions: Vec<Subscription>,
    link: Rc<Link>,
}

impl Connection {
    pub(super) fn new(
        primary: EditorId,
        secondary: EditorId,
        subscriptions: Vec<Subscription>,
        link: Rc<Link>,
    ) -> Self {
        Self {
            primary,
            secondary,
            subscriptions,
            link,
        }
    }

    pub fn primary(&self) -> EditorId {
        self.primary
    }

    pub fn secondary(&self) -> EditorId {
        self.secondary
    }

    pub fn stats(&self) -> RelayStats {
        self.link.stats.get()
    }

    pub fn is_connected(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    /// Removes both listeners
    pub fn disconnect(mut self) {
        self.release();
    }

    /// Leaves both listeners registered for as long as the editors live.
    /// The pair stays claimed until one of them is dropped.
    pub fn detach(mut self) {
        log::debug!("relay {} <-> {} detached", self.primary, self.secondary);
        // Dropping a subscription handle does not unsubscribe
        self.subscriptions.clear();
    }

    fn release(&mut self) {
        if self.subscriptions.is_empty() {
            return;
        }
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
        registry::release(PairKey::new(self.primary, self.secondary));
        log::info!("relay {} <-> {} disconnected", self.primary, self.secondary);
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("primary", &self.primary)
            .field("secondary", &self.secondary)
            .field("connected", &self.is_connected())
            .field("stats", &self.stats())
            .finish()
    }
}
