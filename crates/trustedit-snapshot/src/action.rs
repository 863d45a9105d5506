//! The closed set of trust actions a snapshot entry can carry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Action applied to a single path in a changeset.
///
/// The snapshot schema maps each path to exactly one of these tags; any
/// other tag in a session file is a schema violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Add the path to the ancillary trust database.
    Add,
    /// Remove the path from the ancillary trust database.
    Delete,
}

impl Action {
    /// Wire tag used in snapshot files.
    pub fn as_tag(&self) -> &'static str {
        match self {
            Action::Add => "Add",
            Action::Delete => "Delete",
        }
    }

    /// Parse a wire tag, `None` for anything outside the closed set.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Add" => Some(Action::Add),
            "Delete" => Some(Action::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}
