use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use crate::editor::EditorId;

/// Errors that can occur while building a command from user input
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("command name is empty")]
    EmptyName,

    #[error("invalid command payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

/// Result type for command construction
pub type CommandResult<T> = Result<T, CommandError>;

/// An opaque unit of document change.
///
/// The relay never looks inside a command. The reference editor stores it as
/// a JSON object of the form `{"name": ..., "payload": ...}`, and the name is
/// only read for diagnostics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Command(Value);

impl Command {
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        Self(json!({
            "name": name.into(),
            "payload": payload,
        }))
    }

    /// Wraps an arbitrary JSON value without checking its shape
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Builds a command from a name and a JSON payload typed by the user.
    /// A blank payload becomes `null`.
    pub fn parse(name: &str, payload: &str) -> CommandResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CommandError::EmptyName);
        }

        let payload = if payload.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(payload)?
        };

        Ok(Self::new(name, payload))
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    pub fn payload(&self) -> Option<&Value> {
        self.0.get("payload")
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Commands emitted together by one editor, tagged with the instance the
/// change originated from.
///
/// An editor replaying a batch it received through `next` keeps the origin
/// when it re-emits, which is what lets the relay recognise echoes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommandBatch<C> {
    pub origin: EditorId,
    pub commands: Vec<C>,
}

impl<C> CommandBatch<C> {
    pub fn new(origin: EditorId, commands: Vec<C>) -> Self {
        Self { origin, commands }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, C> {
        self.commands.iter()
    }
}

impl<'a, C> IntoIterator for &'a CommandBatch<C> {
    type Item = &'a C;
    type IntoIter = std::slice::Iter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
