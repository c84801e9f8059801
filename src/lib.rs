#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod editor;
pub mod error;
pub mod event;
pub mod harness;
pub mod relay;

pub use app::RelayApp;
pub use command::{Command, CommandBatch};
pub use editor::{Editor, EditorId, LocalEditor};
pub use error::{RelayError, RelayResult};
pub use event::{EventBus, Subscription};
pub use harness::{HarnessConfig, Mounted, Side, mount};
pub use relay::{Connection, Relay, RelayConfig, RelayStats};
