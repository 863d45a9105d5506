//! Session snapshot storage for trustedit.
//!
//! A snapshot is a flat JSON file capturing the pending changeset queue at
//! one point in time. Files are named `<base>_<timestamp>.json` with a
//! microsecond-resolution timestamp, so lexicographic filename order is
//! chronological order. The store owns naming, listing, retention and
//! deletion of these files; it knows nothing about queues or sessions.
//!
//! # Example
//!
//! ```no_run
//! use trustedit_snapshot::{Action, SnapshotStore};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SnapshotStore::new("/tmp/FaCurrentSession.tmp");
//!
//! let written = store.write(&[("/bin/foo".to_string(), Action::Add)])?;
//! let entries = store.read(&written)?;
//! assert_eq!(entries, vec![("/bin/foo".to_string(), Action::Add)]);
//! # Ok(())
//! # }
//! ```

mod action;
mod error;
mod store;

pub use action::Action;
pub use error::{SnapshotError, SnapshotResult};
pub use store::SnapshotStore;
