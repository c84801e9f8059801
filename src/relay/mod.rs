//! Mirrors the command streams of two editor instances into each other.
//!
//! Every batch one editor emits is replayed into the other through
//! [`Editor::next`]. Editors usually re-emit what they apply, so each
//! connection guards against echoes in two ways:
//!
//! - a batch whose origin is the target editor is never forwarded to it;
//! - while a batch is being delivered into one side, a batch that side emits
//!   with the same commands is treated as an echo of that delivery and
//!   dropped.
//!
//! Anything else the target emits mid-delivery is a new edit. It is queued
//! and forwarded once the delivery returns, so both editors converge.
//!
//! Wired pairs are tracked per thread, so no two relays can connect the same
//! pair at once.

mod connection;
mod forward;
mod registry;

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::editor::{Editor, EditorId};
use crate::error::{RelayError, RelayResult};

pub use connection::{Connection, Direction, DirectionStats, RelayStats};
use connection::Link;
use forward::{Forwarder, Hop};

/// Labels used for the diagnostic marker logged on every forwarded batch
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub primary_label: String,
    pub secondary_label: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            primary_label: "editor".to_owned(),
            secondary_label: "editor2".to_owned(),
        }
    }
}

/// Unordered pair of editor ids
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct PairKey(EditorId, EditorId);

impl PairKey {
    fn new(a: EditorId, b: EditorId) -> Self {
        if a <= b { Self(a, b) } else { Self(b, a) }
    }
}

/// Connects pairs of editors, labelling the diagnostics of each side.
#[derive(Debug, Default)]
pub struct Relay {
    config: RelayConfig,
}

impl Relay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RelayConfig) -> Self {
        Self { config }
    }

    /// Whether the two editors are currently wired, in either order and by
    /// any relay on this thread
    pub fn is_connected(&self, a: EditorId, b: EditorId) -> bool {
        registry::contains(PairKey::new(a, b))
    }

    /// Subscribes each editor to the other's command stream.
    ///
    /// Only `id` and `subscribe` are called on the editors. Connecting a pair
    /// that is already connected is rejected, in either order.
    pub fn connect<A, B>(&self, primary: &Rc<A>, secondary: &Rc<B>) -> RelayResult<Connection>
    where
        A: Editor + 'static,
        B: Editor<Command = A::Command> + 'static,
    {
        let primary_id = primary.id();
        let secondary_id = secondary.id();
        if primary_id == secondary_id {
            return Err(RelayError::SameEditor(primary_id));
        }

        let primary_alive = Rc::downgrade(primary);
        let secondary_alive = Rc::downgrade(secondary);
        let claimed = registry::claim(
            PairKey::new(primary_id, secondary_id),
            Box::new(move || primary_alive.strong_count() > 0 && secondary_alive.strong_count() > 0),
        );
        if !claimed {
            log::warn!("editors {primary_id} and {secondary_id} are already connected");
            return Err(RelayError::AlreadyConnected {
                primary: primary_id,
                secondary: secondary_id,
            });
        }

        let link = Rc::new(Link::default());
        let hop = Rc::new(Hop::new());
        let to_secondary = primary.subscribe(
            Forwarder::new(
                primary_id,
                Rc::downgrade(secondary),
                self.config.primary_label.clone(),
                Direction::PrimaryToSecondary,
                Rc::clone(&link),
                Rc::clone(&hop),
            )
            .into_listener(),
        );
        let to_primary = secondary.subscribe(
            Forwarder::new(
                secondary_id,
                Rc::downgrade(primary),
                self.config.secondary_label.clone(),
                Direction::SecondaryToPrimary,
                Rc::clone(&link),
                hop,
            )
            .into_listener(),
        );

        log::info!("relay {primary_id} <-> {secondary_id} connected");
        Ok(Connection::new(
            primary_id,
            secondary_id,
            vec![to_secondary, to_primary],
            link,
        ))
    }
}
