//! Session orchestration: autosave on every mutation, crash restore at
//! startup, snapshot cleanup on clear/apply/shutdown.
//!
//! The manager owns the queue, the snapshot store, the bus and the list of
//! snapshot files written for the current session. It is built explicitly
//! and passed by reference to whoever needs it; there is no global
//! instance. Dropping the manager force-sweeps every file matching the
//! configured base pattern, including strays left by an earlier crash.
//!
//! Disk failure during autosave is reported and swallowed: losing a backup
//! is recoverable, losing the in-memory edit is not.

use crate::apply::TrustStore;
use crate::bus::{Bus, EventKind, SessionEvent, Severity, SubscriberId};
use crate::changeset::Changeset;
use crate::config::SessionConfig;
use crate::error::{CoreError, CoreResult};
use crate::queue::{ChangeQueue, DirtyTransition};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use trustedit_snapshot::{Action, SnapshotStore};

/// Result of a [`SessionManager::restore_previous_session`] scan.
#[derive(Debug, Clone, Default)]
pub struct RestoreReport {
    /// The candidate that loaded successfully, if any.
    pub restored: Option<PathBuf>,
    /// Candidates that failed to parse or load, newest first.
    pub failed: Vec<PathBuf>,
}

impl RestoreReport {
    pub fn is_restored(&self) -> bool {
        self.restored.is_some()
    }
}

/// Orchestrates the changeset queue, the snapshot store and the bus.
pub struct SessionManager<C> {
    config: SessionConfig,
    store: SnapshotStore,
    queue: ChangeQueue<C>,
    bus: Bus,
    /// Snapshot files written during the current session.
    tracked: Vec<PathBuf>,
    /// The current operator-visible notification, if one is showing.
    notification: Option<(String, Severity)>,
}

impl<C: Changeset> SessionManager<C> {
    /// Create a session manager over the configured base filename.
    pub fn new(config: SessionConfig) -> Self {
        Self::with_bus(config, Bus::new())
    }

    /// Create a session manager publishing on a caller-supplied bus.
    pub fn with_bus(config: SessionConfig, bus: Bus) -> Self {
        let store = SnapshotStore::new(&config.base_filename);
        Self {
            config,
            store,
            queue: ChangeQueue::new(),
            bus,
            tracked: Vec::new(),
            notification: None,
        }
    }

    // ------------------------------------------------------------------
    // Queue operations
    // ------------------------------------------------------------------

    /// Append a changeset to the pending queue.
    pub fn add(&mut self, changeset: C) {
        let transition = self.queue.add(changeset);
        self.autosave();
        self.publish_dirty(transition);
    }

    /// Remove and return the next changeset to apply.
    pub fn dequeue(&mut self) -> CoreResult<C> {
        let (changeset, transition) = self.queue.dequeue()?;
        self.autosave();
        self.publish_dirty(transition);
        Ok(changeset)
    }

    /// Discard the pending queue and delete this session's snapshot files.
    pub fn clear(&mut self) {
        info!("Clearing pending changeset queue");
        let transition = self.queue.clear();
        self.cleanup_tracked();
        self.publish_dirty(transition);
    }

    /// Drop only the most recently added pending changeset.
    pub fn discard_last(&mut self) -> Option<C> {
        let (changeset, transition) = self.queue.discard_last()?;
        self.autosave();
        self.publish_dirty(transition);
        Some(changeset)
    }

    /// Undo the last-added pending changeset. Returns the new pending
    /// queue; a no-op when nothing is pending.
    pub fn undo(&mut self) -> &[C] {
        if let Some(transition) = self.queue.undo() {
            self.autosave();
            self.publish_dirty(transition);
        }
        self.queue.pending()
    }

    /// Redo the most recently undone changeset. Returns the new pending
    /// queue; a no-op when nothing has been undone.
    pub fn redo(&mut self) -> &[C] {
        if let Some(transition) = self.queue.redo() {
            self.autosave();
            self.publish_dirty(transition);
        }
        self.queue.pending()
    }

    /// True iff unapplied pending changes exist.
    pub fn is_dirty(&self) -> bool {
        self.queue.is_dirty()
    }

    /// The pending queue, in application order.
    pub fn pending(&self) -> &[C] {
        self.queue.pending()
    }

    /// The undo stack, oldest first.
    pub fn undone(&self) -> &[C] {
        self.queue.undone()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Edit session management
    // ------------------------------------------------------------------

    /// Serialize the pending queue to an explicit path, independent of
    /// autosave naming. Serialization failures propagate to the caller;
    /// nothing is written unless every changeset serializes.
    pub fn save_session(&self, path: &Path) -> CoreResult<()> {
        info!(path = %path.display(), "Saving edit session");
        let entries = self.serialize_pending()?;
        self.store.write_to(path, &entries)?;
        Ok(())
    }

    /// Replace the current session with the one saved at `path`.
    ///
    /// On load failure the queue is untouched, an error notification is
    /// published and the error returned. On success the current pending
    /// queue is drained onto the undo stack and the loaded changesets take
    /// its place as one compound, undoable operation.
    pub fn open_session(&mut self, path: &Path) -> CoreResult<()> {
        info!(path = %path.display(), "Opening edit session");
        let entries = match self.store.read(path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load edit session");
                self.notify(
                    format!("Failed to load edit session from file {}", path.display()),
                    Severity::Error,
                );
                return Err(e.into());
            }
        };

        self.install_session(entries);
        Ok(())
    }

    /// Replace the queue with loaded entries as one compound operation:
    /// one checkpoint, one autosave, one `session_loaded`, at most one
    /// `queue_updated`.
    fn install_session(&mut self, entries: Vec<(String, Action)>) {
        let dirty_before = self.queue.is_dirty();
        if !entries.is_empty() {
            // The old session ends here; its snapshot files go with it.
            self.cleanup_tracked();
            self.queue.checkpoint();
            self.queue.add(C::deserialize(entries.clone()));
            self.autosave();
        }

        self.bus.publish(&SessionEvent::SessionLoaded { entries });
        let dirty_after = self.queue.is_dirty();
        if dirty_after != dirty_before {
            self.bus.publish(&SessionEvent::QueueUpdated { dirty: dirty_after });
        }
    }

    /// Whether any snapshot files from an earlier session are on disk.
    pub fn detect_previous_session(&self) -> bool {
        let candidates = self.store.list_candidates();
        if candidates.is_empty() {
            debug!("No previous session files detected");
            false
        } else {
            info!(count = candidates.len(), "Previous session files detected");
            true
        }
    }

    /// Scan snapshot candidates newest-first; the first one that parses
    /// is loaded and wins. Unreadable candidates are reported and skipped
    /// without aborting the scan. After a successful load every candidate
    /// file is deleted so the restored session cannot be applied twice.
    pub fn restore_previous_session(&mut self) -> RestoreReport {
        info!("Restoring previous edit session");
        let candidates = self.store.list_candidates();

        let mut report = RestoreReport::default();
        let mut loaded: Option<(PathBuf, Vec<(String, Action)>)> = None;
        for candidate in candidates.iter().rev() {
            match self.store.read(candidate) {
                Ok(entries) => {
                    if loaded.is_none() {
                        loaded = Some((candidate.clone(), entries));
                    }
                    // Older valid snapshots are superseded; nothing to report.
                }
                Err(e) => {
                    warn!(path = %candidate.display(), error = %e, "Restore candidate failed to load");
                    report.failed.push(candidate.clone());
                }
            }
        }

        match loaded {
            Some((path, entries)) => {
                info!(path = %path.display(), "Restored previous session");
                self.install_session(entries);
                report.restored = Some(path);

                // All candidates are now stale; the fresh autosave written
                // by the install is the only snapshot that should survive.
                for candidate in candidates {
                    if let Err(e) = self.store.delete(&candidate) {
                        warn!(path = %candidate.display(), error = %e, "Failed to delete stale session file");
                    }
                }
            }
            None => {
                if !report.failed.is_empty() {
                    self.notify(
                        "Failed to restore previous session: no loadable session file",
                        Severity::Error,
                    );
                }
            }
        }

        report
    }

    /// Hand the pending queue to the trust store collaborator. Only when
    /// it accepts are the queue and this session's snapshot files cleared,
    /// so a failed apply loses nothing and a successful one cannot be
    /// replayed from disk.
    pub fn apply_to<S: TrustStore<C>>(&mut self, target: &mut S) -> CoreResult<()> {
        let pending = self.queue.pending().to_vec();
        info!(changesets = pending.len(), "Applying pending changesets to trust store");
        target
            .apply(&pending)
            .map_err(|e| CoreError::Apply(e.to_string()))?;

        let transition = self.queue.clear();
        self.cleanup_tracked();
        self.publish_dirty(transition);
        self.notify(
            format!("Applied {} changeset(s)", pending.len()),
            Severity::Success,
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Notifications and subscriptions
    // ------------------------------------------------------------------

    /// Raise an operator-visible notification.
    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) {
        let message = message.into();
        self.notification = Some((message.clone(), severity));
        self.bus
            .publish(&SessionEvent::NotificationAdded { message, severity });
    }

    /// Dismiss the current notification, if one is showing.
    pub fn dismiss_notification(&mut self) {
        if let Some((message, severity)) = self.notification.take() {
            self.bus
                .publish(&SessionEvent::NotificationRemoved { message, severity });
        }
    }

    /// Register a callback on one of the bus channels.
    pub fn subscribe<F>(&mut self, kind: EventKind, callback: F) -> SubscriberId
    where
        F: FnMut(&SessionEvent) + 'static,
    {
        self.bus.subscribe(kind, callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.bus.unsubscribe(id);
    }

    // ------------------------------------------------------------------
    // Autosave internals
    // ------------------------------------------------------------------

    fn serialize_pending(&self) -> CoreResult<Vec<(String, Action)>> {
        let mut entries = Vec::new();
        for changeset in self.queue.pending() {
            entries.extend(changeset.serialize()?);
        }
        Ok(entries)
    }

    /// Write a fresh snapshot of the pending queue and prune the oldest
    /// beyond the retention limit. Failures are reported but never roll
    /// back the queue mutation that triggered the save.
    fn autosave(&mut self) {
        if !self.config.autosave_enabled {
            debug!("Session autosave is disabled; skipping");
            return;
        }

        let entries = match self.serialize_pending() {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Autosave skipped: pending queue failed to serialize");
                self.notify(
                    format!("Failed to autosave edit session: {e}"),
                    Severity::Error,
                );
                return;
            }
        };

        match self.store.write(&entries) {
            Ok(path) => {
                debug!(path = %path.display(), "Autosaved edit session");
                self.tracked.push(path);
                match self.store.prune(self.config.retain_count) {
                    Ok(Some(deleted)) => self.tracked.retain(|p| *p != deleted),
                    Ok(None) => {}
                    Err(e) => warn!(error = %e, "Failed to prune oldest session snapshot"),
                }
            }
            Err(e) => {
                warn!(error = %e, "Autosave failed; in-memory edits are kept");
                self.notify(
                    format!("Failed to autosave edit session: {e}"),
                    Severity::Error,
                );
            }
        }
    }

    fn publish_dirty(&mut self, transition: DirtyTransition) {
        if let Some(dirty) = transition.changed_to() {
            self.bus.publish(&SessionEvent::QueueUpdated { dirty });
        }
    }
}

impl<C> SessionManager<C> {
    /// Delete every snapshot file written during the current session.
    fn cleanup_tracked(&mut self) {
        debug!(files = self.tracked.len(), "Cleaning up autosaved session files");
        for path in std::mem::take(&mut self.tracked) {
            if let Err(e) = self.store.delete(&path) {
                warn!(path = %path.display(), error = %e, "Failed to delete session snapshot");
            }
        }
    }

    /// Brute-force sweep of every file matching the base pattern, tracked
    /// or not. Catches files an earlier crash left behind before they were
    /// recorded in the tracked list.
    fn force_cleanup(&mut self) {
        for candidate in self.store.list_candidates() {
            if !self.tracked.contains(&candidate) {
                debug!(path = %candidate.display(), "Adding stray session file to deletion list");
                self.tracked.push(candidate);
            }
        }
        self.cleanup_tracked();
    }
}

impl<C> Drop for SessionManager<C> {
    fn drop(&mut self) {
        debug!("Session terminating; sweeping snapshot files");
        self.force_cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changeset::TrustChangeset;
    use crate::error::QueueError;
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir, autosave: bool) -> SessionConfig {
        SessionConfig {
            autosave_enabled: autosave,
            base_filename: dir.path().join("TestSession.tmp"),
            retain_count: 2,
        }
    }

    fn manager(dir: &TempDir, autosave: bool) -> SessionManager<TrustChangeset> {
        SessionManager::new(test_config(dir, autosave))
    }

    fn cs(path: &str) -> TrustChangeset {
        let mut cs = TrustChangeset::new();
        cs.add_trust(path);
        cs
    }

    fn snapshot_files(dir: &TempDir) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| {
                let name = p.file_name().unwrap().to_string_lossy().into_owned();
                name.starts_with("TestSession.tmp_") && name.ends_with(".json")
            })
            .collect();
        files.sort();
        files
    }

    // Autosave filenames have microsecond resolution.
    fn tick() {
        std::thread::sleep(std::time::Duration::from_millis(2));
    }

    #[test]
    fn autosave_writes_a_snapshot_per_mutation() {
        let dir = TempDir::new().unwrap();
        let mut session = manager(&dir, true);

        session.add(cs("/bin/a"));
        assert_eq!(snapshot_files(&dir).len(), 1);

        tick();
        session.add(cs("/bin/b"));
        assert_eq!(snapshot_files(&dir).len(), 2);
    }

    #[test]
    fn autosave_disabled_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut session = manager(&dir, false);

        session.add(cs("/bin/a"));
        session.add(cs("/bin/b"));
        session.undo();
        session.redo();

        assert!(session.is_dirty());
        assert!(snapshot_files(&dir).is_empty());
    }

    #[test]
    fn autosave_failure_keeps_the_in_memory_edit() {
        let dir = TempDir::new().unwrap();
        // Point autosave at a directory that does not exist so every
        // snapshot write fails at the filesystem.
        let config = SessionConfig {
            autosave_enabled: true,
            base_filename: dir.path().join("missing").join("TestSession.tmp"),
            retain_count: 2,
        };
        let mut session: SessionManager<TrustChangeset> = SessionManager::new(config);

        let errors = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&errors);
        session.subscribe(EventKind::NotificationAdded, move |e| {
            if let SessionEvent::NotificationAdded { severity, .. } = e {
                assert_eq!(*severity, Severity::Error);
                *counter.borrow_mut() += 1;
            }
        });

        session.add(cs("/bin/a"));

        // The mutation stands; the failed backup is reported exactly once.
        assert_eq!(session.pending(), &[cs("/bin/a")]);
        assert!(session.is_dirty());
        assert_eq!(*errors.borrow(), 1);
        assert!(snapshot_files(&dir).is_empty());
    }

    #[test]
    fn retention_keeps_only_the_newest_snapshots() {
        let dir = TempDir::new().unwrap();
        let mut session = manager(&dir, true);

        let mut all_written = Vec::new();
        for i in 0..5 {
            session.add(cs(&format!("/bin/tool{i}")));
            all_written.push(snapshot_files(&dir).last().unwrap().clone());
            tick();
        }

        let remaining = snapshot_files(&dir);
        assert_eq!(remaining.len(), 2);
        assert_eq!(remaining, all_written[3..].to_vec());
    }

    #[test]
    fn clear_discards_queue_and_session_files() {
        let dir = TempDir::new().unwrap();
        let mut session = manager(&dir, true);

        session.add(cs("/bin/a"));
        tick();
        session.add(cs("/bin/b"));
        assert!(session.is_dirty());
        assert!(!snapshot_files(&dir).is_empty());

        session.clear();
        assert!(session.pending().is_empty());
        assert!(!session.is_dirty());
        assert!(snapshot_files(&dir).is_empty());
    }

    #[test]
    fn restore_skips_corrupt_candidates_and_loads_newest_valid() {
        let dir = TempDir::new().unwrap();
        let s1 = dir.path().join("TestSession.tmp_20200101_000000_000000.json");
        let s2 = dir.path().join("TestSession.tmp_20200102_000000_000000.json");
        fs::write(&s1, "{ not json").unwrap();
        fs::write(&s2, "{\"/bin/foo\": \"Add\"}").unwrap();

        let mut session = manager(&dir, true);
        assert!(session.detect_previous_session());

        let loaded = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&loaded);
        session.subscribe(EventKind::SessionLoaded, move |e| {
            sink.borrow_mut().push(e.clone());
        });

        let report = session.restore_previous_session();
        assert_eq!(report.restored, Some(s2.clone()));
        assert_eq!(report.failed, vec![s1.clone()]);

        // Loaded queue round-trips to the original mapping.
        assert_eq!(session.pending().len(), 1);
        assert_eq!(
            session.pending()[0].entries(),
            &[("/bin/foo".to_string(), trustedit_snapshot::Action::Add)]
        );
        assert_eq!(
            *loaded.borrow(),
            vec![SessionEvent::SessionLoaded {
                entries: vec![("/bin/foo".to_string(), trustedit_snapshot::Action::Add)]
            }]
        );

        // Consumed candidates are gone; only the fresh autosave remains.
        assert!(!s1.exists());
        assert!(!s2.exists());
        assert_eq!(snapshot_files(&dir).len(), 1);
    }

    #[test]
    fn restore_with_no_valid_candidate_leaves_queue_empty() {
        let dir = TempDir::new().unwrap();
        let s1 = dir.path().join("TestSession.tmp_20200101_000000_000000.json");
        let s2 = dir.path().join("TestSession.tmp_20200102_000000_000000.json");
        fs::write(&s1, "garbage").unwrap();
        fs::write(&s2, "[\"wrong\", \"schema\"]").unwrap();

        let mut session = manager(&dir, true);
        let report = session.restore_previous_session();

        assert!(!report.is_restored());
        assert_eq!(report.failed, vec![s2, s1]);
        assert!(session.pending().is_empty());
        assert!(!session.is_dirty());
    }

    #[test]
    fn open_session_failure_leaves_queue_untouched() {
        let dir = TempDir::new().unwrap();
        let bad = dir.path().join("saved.json");
        fs::write(&bad, "{\"/bin/foo\": \"NotATag\"}").unwrap();

        let mut session = manager(&dir, false);
        session.add(cs("/bin/keep"));

        let errors = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&errors);
        session.subscribe(EventKind::NotificationAdded, move |e| {
            if let SessionEvent::NotificationAdded { severity, .. } = e {
                assert_eq!(*severity, Severity::Error);
                *counter.borrow_mut() += 1;
            }
        });

        assert!(session.open_session(&bad).is_err());
        assert_eq!(session.pending(), &[cs("/bin/keep")]);
        assert_eq!(*errors.borrow(), 1);
    }

    #[test]
    fn open_session_is_one_undoable_operation() {
        let dir = TempDir::new().unwrap();
        let saved = dir.path().join("saved.json");

        let mut session = manager(&dir, false);
        session.add(cs("/bin/old"));
        session.save_session(&saved).unwrap();

        session.clear();
        session.add(cs("/bin/current"));
        session.open_session(&saved).unwrap();

        assert_eq!(session.pending().len(), 1);
        assert_eq!(
            session.pending()[0].entries(),
            &[("/bin/old".to_string(), trustedit_snapshot::Action::Add)]
        );

        // One undo removes the whole loaded session; the checkpointed
        // queue is the next redo candidate after that.
        session.undo();
        assert!(session.pending().is_empty());
        session.redo();
        assert_eq!(session.pending().len(), 1);
    }

    #[test]
    fn queue_updated_fires_once_per_flag_transition() {
        let dir = TempDir::new().unwrap();
        let mut session = manager(&dir, false);

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        session.subscribe(EventKind::QueueUpdated, move |e| {
            if let SessionEvent::QueueUpdated { dirty } = e {
                sink.borrow_mut().push(*dirty);
            }
        });

        session.add(cs("/bin/a"));
        session.add(cs("/bin/b"));
        assert_eq!(*events.borrow(), vec![true]);

        session.dequeue().unwrap();
        assert_eq!(*events.borrow(), vec![true]);
        session.dequeue().unwrap();
        assert_eq!(*events.borrow(), vec![true, false]);

        // No-op undo publishes nothing.
        session.undo();
        assert_eq!(*events.borrow(), vec![true, false]);
    }

    #[test]
    fn dequeue_on_empty_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut session = manager(&dir, false);
        assert!(matches!(
            session.dequeue().unwrap_err(),
            CoreError::Queue(QueueError::Empty)
        ));
    }

    #[test]
    fn save_session_round_trips_through_explicit_path() {
        let dir = TempDir::new().unwrap();
        let saved = dir.path().join("manual-save.json");

        let mut session = manager(&dir, false);
        session.add(cs("/usr/bin/make"));
        let mut both = TrustChangeset::new();
        both.add_trust("/usr/bin/gcc").del_trust("/usr/bin/ld");
        session.add(both);

        session.save_session(&saved).unwrap();

        let mut fresh = manager(&dir, false);
        fresh.open_session(&saved).unwrap();
        let entries = fresh.pending()[0].entries().to_vec();
        let expect = |p: &str| entries.iter().find(|(path, _)| path == p).cloned();
        assert_eq!(
            expect("/usr/bin/make"),
            Some(("/usr/bin/make".to_string(), trustedit_snapshot::Action::Add))
        );
        assert_eq!(
            expect("/usr/bin/ld"),
            Some(("/usr/bin/ld".to_string(), trustedit_snapshot::Action::Delete))
        );
    }

    #[derive(Debug, Clone)]
    struct BrokenChangeset;

    impl Changeset for BrokenChangeset {
        fn serialize(&self) -> CoreResult<Vec<(String, Action)>> {
            Err(CoreError::Serialization("path is not valid UTF-8".into()))
        }

        fn deserialize(_entries: Vec<(String, Action)>) -> Self {
            BrokenChangeset
        }
    }

    #[test]
    fn save_session_propagates_serialization_failure_without_writing() {
        let dir = TempDir::new().unwrap();
        let saved = dir.path().join("manual-save.json");

        let mut session: SessionManager<BrokenChangeset> =
            SessionManager::new(test_config(&dir, false));
        session.add(BrokenChangeset);

        assert!(matches!(
            session.save_session(&saved).unwrap_err(),
            CoreError::Serialization(_)
        ));
        assert!(!saved.exists());
    }

    #[test]
    fn drop_sweeps_tracked_and_stray_files() {
        let dir = TempDir::new().unwrap();
        let stray = dir.path().join("TestSession.tmp_19990101_000000_000000.json");
        fs::write(&stray, "{}").unwrap();

        let mut session = manager(&dir, true);
        session.add(cs("/bin/a"));
        assert!(!snapshot_files(&dir).is_empty());

        drop(session);
        assert!(snapshot_files(&dir).is_empty());
        assert!(!stray.exists());
    }

    #[derive(Default)]
    struct FakeTrustStore {
        applied: Vec<TrustChangeset>,
        reject: bool,
    }

    impl TrustStore<TrustChangeset> for FakeTrustStore {
        type Error = String;

        fn apply(&mut self, changesets: &[TrustChangeset]) -> Result<(), String> {
            if self.reject {
                return Err("fapolicyd is not running".to_string());
            }
            self.applied.extend_from_slice(changesets);
            Ok(())
        }
    }

    #[test]
    fn apply_clears_queue_and_snapshots_exactly_once() {
        let dir = TempDir::new().unwrap();
        let mut session = manager(&dir, true);
        session.add(cs("/bin/a"));
        tick();
        session.add(cs("/bin/b"));

        let mut target = FakeTrustStore::default();
        session.apply_to(&mut target).unwrap();

        assert_eq!(target.applied, vec![cs("/bin/a"), cs("/bin/b")]);
        assert!(session.pending().is_empty());
        assert!(!session.is_dirty());
        assert!(snapshot_files(&dir).is_empty());
    }

    #[test]
    fn failed_apply_loses_nothing() {
        let dir = TempDir::new().unwrap();
        let mut session = manager(&dir, true);
        session.add(cs("/bin/a"));

        let mut target = FakeTrustStore {
            reject: true,
            ..FakeTrustStore::default()
        };
        assert!(matches!(
            session.apply_to(&mut target).unwrap_err(),
            CoreError::Apply(_)
        ));
        assert_eq!(session.pending(), &[cs("/bin/a")]);
        assert!(!snapshot_files(&dir).is_empty());
    }

    #[test]
    fn notifications_publish_added_then_removed() {
        let dir = TempDir::new().unwrap();
        let mut session = manager(&dir, false);

        let events = Rc::new(RefCell::new(Vec::new()));
        for kind in [EventKind::NotificationAdded, EventKind::NotificationRemoved] {
            let sink = Rc::clone(&events);
            session.subscribe(kind, move |e| sink.borrow_mut().push(e.clone()));
        }

        session.notify("trust update deployed", Severity::Success);
        session.dismiss_notification();
        // Dismissing twice is a no-op.
        session.dismiss_notification();

        let events = events.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind(), EventKind::NotificationAdded);
        assert_eq!(events[1].kind(), EventKind::NotificationRemoved);
    }

    #[test]
    fn detect_previous_session_sees_only_matching_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("unrelated.json"), "{}").unwrap();

        let session = manager(&dir, false);
        assert!(!session.detect_previous_session());

        fs::write(
            dir.path().join("TestSession.tmp_20200101_000000_000000.json"),
            "{}",
        )
        .unwrap();
        assert!(session.detect_previous_session());
    }
}
