//! The trust store collaborator interface.

use crate::changeset::Changeset;

/// Anything that can apply a batch of changesets to a live trust database.
///
/// The engine only invokes `apply`; what the target does with the
/// changesets is outside its concern. The session manager clears the queue
/// and its snapshot files only after `apply` returns `Ok`, which is what
/// keeps application exactly-once.
pub trait TrustStore<C: Changeset> {
    type Error: std::fmt::Display;

    /// Apply the changesets, in queue order.
    fn apply(&mut self, changesets: &[C]) -> Result<(), Self::Error>;
}
