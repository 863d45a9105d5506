//! The changeset operand consumed by the queue and session engine.
//!
//! The engine never looks inside a changeset; it only stores, orders and
//! serializes it. Anything that can round-trip through path/action pairs
//! can ride the queue.

use crate::error::CoreResult;
use trustedit_snapshot::Action;

/// An atomic, serializable unit of trust-policy change.
///
/// `deserialize(serialize(cs))` must be lossless for the path/action pairs;
/// object boundaries are allowed to differ (a whole session file may come
/// back as one multi-entry changeset).
pub trait Changeset: Clone {
    /// Flatten to path/action pairs, in insertion order.
    fn serialize(&self) -> CoreResult<Vec<(String, Action)>>;

    /// Rebuild from path/action pairs.
    fn deserialize(entries: Vec<(String, Action)>) -> Self;
}

/// Changeset over the ancillary trust database.
///
/// Insertion-ordered; trusting and untrusting the same path later in the
/// same changeset overwrites the earlier decision at serialization time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustChangeset {
    entries: Vec<(String, Action)>,
}

impl TrustChangeset {
    /// Create an empty changeset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a path as trusted.
    pub fn add_trust(&mut self, path: impl Into<String>) -> &mut Self {
        self.entries.push((path.into(), Action::Add));
        self
    }

    /// Record a path as untrusted.
    pub fn del_trust(&mut self, path: impl Into<String>) -> &mut Self {
        self.entries.push((path.into(), Action::Delete));
        self
    }

    /// The recorded path/action pairs, in insertion order.
    pub fn entries(&self) -> &[(String, Action)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Changeset for TrustChangeset {
    fn serialize(&self) -> CoreResult<Vec<(String, Action)>> {
        Ok(self.entries.clone())
    }

    fn deserialize(entries: Vec<(String, Action)>) -> Self {
        Self { entries }
    }
}
