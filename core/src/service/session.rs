use std::sync::{Arc, RwLock};

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::model::snapshot::Snapshot;
use crate::repository::DataSource;

/// Holds the last fetched snapshot for a session. Readers get an `Arc` to a
/// complete snapshot; a refresh swaps in a new one without touching the old.
pub struct SessionStore<S: DataSource> {
    source: S,
    current: RwLock<Option<Arc<Snapshot>>>,
}

impl<S: DataSource> SessionStore<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            current: RwLock::new(None),
        }
    }

    /// Cached snapshot, fetching once if nothing has been loaded yet.
    pub fn snapshot(&self) -> Result<Arc<Snapshot>> {
        if let Some(snapshot) = self.cached() {
            return Ok(snapshot);
        }
        debug!("no cached snapshot, fetching");
        self.refresh()
    }

    pub fn cached(&self) -> Option<Arc<Snapshot>> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Fetches and replaces the snapshot. On failure the previous one stays.
    pub fn refresh(&self) -> Result<Arc<Snapshot>> {
        let data = self
            .source
            .fetch()
            .inspect_err(|e| warn!(error = %e, "fetch failed"))?;
        let snapshot = Arc::new(
            Snapshot::new(data).inspect_err(|e| warn!(error = %e, "rejected snapshot"))?,
        );
        info!(
            id = %snapshot.id,
            actuals = snapshot.actuals().len(),
            targets = snapshot.targets().len(),
            "loaded snapshot"
        );
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    pub fn clear(&self) {
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::MonthlyTarget;
    use crate::model::snapshot::{DataSet, SnapshotError};
    use anyhow::anyhow;
    use std::cell::Cell;

    struct CountingSource {
        calls: Cell<usize>,
        fail: Cell<bool>,
        duplicate: Cell<bool>,
    }

    impl CountingSource {
        fn new() -> Self {
            Self { calls: Cell::new(0), fail: Cell::new(false), duplicate: Cell::new(false) }
        }
    }

    impl DataSource for CountingSource {
        fn fetch(&self) -> Result<DataSet> {
            self.calls.set(self.calls.get() + 1);
            if self.fail.get() {
                return Err(anyhow!("source unavailable"));
            }
            let mut targets = vec![MonthlyTarget::new(2024, 1)];
            if self.duplicate.get() {
                targets.push(MonthlyTarget::new(2024, 1));
            }
            Ok(DataSet { actuals: vec![], targets })
        }
    }

    #[test]
    fn test_snapshot_fetches_once() {
        let store = SessionStore::new(CountingSource::new());
        let first = store.snapshot().unwrap();
        let second = store.snapshot().unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(store.source.calls.get(), 1);
    }

    #[test]
    fn test_refresh_replaces_but_old_handle_survives() {
        let store = SessionStore::new(CountingSource::new());
        let old = store.snapshot().unwrap();
        let new = store.refresh().unwrap();
        assert_ne!(old.id, new.id);
        assert_eq!(store.cached().unwrap().id, new.id);
        assert_eq!(old.targets().len(), 1);
    }

    #[test]
    fn test_failed_refresh_keeps_previous() {
        let store = SessionStore::new(CountingSource::new());
        let old = store.snapshot().unwrap();

        store.source.fail.set(true);
        assert!(store.refresh().is_err());
        assert_eq!(store.cached().unwrap().id, old.id);

        store.source.fail.set(false);
        store.source.duplicate.set(true);
        let err = store.refresh().unwrap_err();
        assert_eq!(
            err.downcast_ref::<SnapshotError>(),
            Some(&SnapshotError::DuplicateTarget { year: 2024, month: 1 })
        );
        assert_eq!(store.cached().unwrap().id, old.id);
    }

    #[test]
    fn test_clear_forces_refetch() {
        let store = SessionStore::new(CountingSource::new());
        store.snapshot().unwrap();
        store.clear();
        assert!(store.cached().is_none());
        store.snapshot().unwrap();
        assert_eq!(store.source.calls.get(), 2);
    }
}
