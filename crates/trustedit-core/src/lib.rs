//! Changeset queue and editing-session engine for trustedit.
//!
//! This crate is the change-management core of the policy analyzer: an
//! ordered queue of pending trust-policy changesets with undo/redo, a
//! crash-resilient autosave/restore protocol over timestamped snapshot
//! files, and a synchronous observer bus that keeps dependent views in
//! step with queue state.
//!
//! The engine has no UI and never computes trust decisions; it consumes
//! already-built [`Changeset`]s and hands them to a [`TrustStore`]
//! collaborator when the operator applies the session.
//!
//! # Example
//!
//! ```no_run
//! use trustedit_core::{SessionConfig, SessionManager, TrustChangeset};
//!
//! let config = SessionConfig {
//!     autosave_enabled: true,
//!     ..SessionConfig::default()
//! };
//! let mut session: SessionManager<TrustChangeset> = SessionManager::new(config);
//!
//! if session.detect_previous_session() {
//!     let report = session.restore_previous_session();
//!     println!("restored: {}", report.is_restored());
//! }
//!
//! let mut changes = TrustChangeset::new();
//! changes.add_trust("/usr/local/bin/deploy");
//! session.add(changes);
//! ```

mod apply;
mod bus;
mod changeset;
mod config;
mod error;
mod queue;
mod session;

pub use apply::TrustStore;
pub use bus::{Bus, EventKind, SessionEvent, Severity, SubscriberId};
pub use changeset::{Changeset, TrustChangeset};
pub use config::{SessionConfig, DEFAULT_BASE_FILENAME};
pub use error::{CoreError, CoreResult, QueueError};
pub use queue::{ChangeQueue, DirtyTransition};
pub use session::{RestoreReport, SessionManager};

pub use trustedit_snapshot::{Action, SnapshotError, SnapshotStore};
