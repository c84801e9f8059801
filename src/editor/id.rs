use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of one editor instance, stable for its whole lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditorId(Uuid);

impl EditorId {
    /// Generates a fresh random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EditorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EditorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The first group is enough to tell two instances apart in logs
        let hyphenated = self.0.hyphenated().to_string();
        let short = hyphenated.split('-').next().unwrap_or(&hyphenated);
        f.write_str(short)
    }
}
