use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::editor::Editor;
use crate::error::{RelayError, RelayResult};
use crate::relay::{Connection, Relay, RelayConfig};

/// One of the two mount points of the harness
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Primary,
    Secondary,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Primary => write!(f, "primary"),
            Side::Secondary => write!(f, "secondary"),
        }
    }
}

/// Harness settings. Persisted by the demo app between runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub relay: RelayConfig,
    /// Release focus from the secondary editor once both are mounted
    pub blur_secondary: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            relay: RelayConfig::default(),
            blur_secondary: true,
        }
    }
}

/// Two mounted editors mirroring each other
#[derive(Debug)]
pub struct Mounted<E> {
    pub primary: Rc<E>,
    pub secondary: Rc<E>,
    connection: Connection,
}

impl<E> Mounted<E> {
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Disconnects the relay and hands the editors back
    pub fn unmount(self) -> (Rc<E>, Rc<E>) {
        let Mounted {
            primary,
            secondary,
            connection,
        } = self;
        connection.disconnect();
        (primary, secondary)
    }
}

/// Wires the editors found at the two mount points to mirror each other.
///
/// A missing mount point is reported instead of silently skipped.
pub fn mount<E>(
    config: &HarnessConfig,
    primary: Option<Rc<E>>,
    secondary: Option<Rc<E>>,
) -> RelayResult<Mounted<E>>
where
    E: Editor + 'static,
{
    let (primary, secondary) = match (primary, secondary) {
        (Some(primary), Some(secondary)) => (primary, secondary),
        (None, _) => return Err(missing(Side::Primary)),
        (_, None) => return Err(missing(Side::Secondary)),
    };

    let relay = Relay::with_config(config.relay.clone());
    let connection = relay.connect(&primary, &secondary)?;

    if config.blur_secondary {
        secondary.blur();
    }

    Ok(Mounted {
        primary,
        secondary,
        connection,
    })
}

fn missing(side: Side) -> RelayError {
    log::warn!("{side} mount point is missing, editors not connected");
    RelayError::MountPointMissing { side }
}
