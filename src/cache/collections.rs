use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{debug, error, info, trace};

use crate::cache::{fetch_all, CollectionCache};
use crate::config::LoadStrategy;
use crate::model::{Attendance, Course, Entity, Student};
use crate::store::DocumentStore;
use crate::types::EntityKind;

/// What a refresh did to the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Snapshot replaced with this many records
    Replaced(usize),
    /// Fetch failed; the previous snapshot was kept and the failure logged
    KeptPrevious,
    /// Response arrived after dispose and was thrown away
    Discarded,
}

/// Loading flag owned by one page mount.
///
/// Starts out loading and settles once that mount's own fetches are done,
/// so other pages mounting later never flip it back.
#[derive(Debug)]
pub struct PageLoad {
    loading: watch::Sender<bool>,
}

impl PageLoad {
    fn new() -> Self {
        let (loading, _rx) = watch::channel(true);
        Self { loading }
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    fn settle(&self) {
        self.loading.send_replace(false);
    }
}

/// The three cached collections plus the console-wide loading flag
pub struct Collections {
    store: Arc<dyn DocumentStore>,
    strategy: LoadStrategy,
    students: CollectionCache<Student>,
    courses: CollectionCache<Course>,
    attendance: CollectionCache<Attendance>,
    loading: watch::Sender<bool>,
    in_flight: Mutex<usize>,
    disposed: AtomicBool,
}

impl Collections {
    pub fn new(store: Arc<dyn DocumentStore>, strategy: LoadStrategy) -> Self {
        let (loading, _rx) = watch::channel(true);
        Self {
            store,
            strategy,
            students: CollectionCache::new(),
            courses: CollectionCache::new(),
            attendance: CollectionCache::new(),
            loading,
            in_flight: Mutex::new(0),
            disposed: AtomicBool::new(false),
        }
    }

    pub fn students(&self) -> &CollectionCache<Student> {
        &self.students
    }

    pub fn courses(&self) -> &CollectionCache<Course> {
        &self.courses
    }

    pub fn attendance(&self) -> &CollectionCache<Attendance> {
        &self.attendance
    }

    /// Console-wide flag: true before the first load has settled and while
    /// any load is still in flight
    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    /// Fetch all three kinds for a page mount
    pub async fn initial_load(&self) -> PageLoad {
        self.load(&EntityKind::ALL).await
    }

    /// Fetch the given kinds for one page mount.
    ///
    /// The returned flag clears once every kind has settled, whatever the
    /// outcome. After dispose it stays loading.
    pub async fn load(&self, kinds: &[EntityKind]) -> PageLoad {
        let page = PageLoad::new();
        self.begin_load();
        info!("Loading {:?} ({:?})", kinds, self.strategy);

        match self.strategy {
            LoadStrategy::Sequential => {
                for &kind in kinds {
                    self.refresh(kind).await;
                }
            }
            LoadStrategy::Concurrent => {
                futures::future::join_all(kinds.iter().map(|&kind| self.refresh(kind))).await;
            }
        }

        self.end_load();
        if !self.is_disposed() {
            page.settle();
        }
        page
    }

    fn begin_load(&self) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        *in_flight += 1;
        self.loading.send_replace(true);
    }

    fn end_load(&self) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        *in_flight = in_flight.saturating_sub(1);
        if *in_flight > 0 {
            trace!("{} load(s) still in flight", *in_flight);
        } else if !self.is_disposed() {
            self.loading.send_replace(false);
        }
    }

    /// Re-fetch one kind. Leaves the page-level loading flag alone.
    pub async fn refresh(&self, kind: EntityKind) -> RefreshOutcome {
        match kind {
            EntityKind::Students => self.refresh_cache(&self.students).await,
            EntityKind::Courses => self.refresh_cache(&self.courses).await,
            EntityKind::Attendance => self.refresh_cache(&self.attendance).await,
        }
    }

    async fn refresh_cache<T: Entity>(&self, cache: &CollectionCache<T>) -> RefreshOutcome {
        let result = fetch_all::<T>(self.store.as_ref()).await;

        if self.is_disposed() {
            trace!("Discarding late {} response after dispose", T::KIND);
            return RefreshOutcome::Discarded;
        }

        match result {
            Ok(items) => {
                let count = items.len();
                cache.replace(items);
                debug!("Replaced {} snapshot with {} records", T::KIND, count);
                RefreshOutcome::Replaced(count)
            }
            Err(e) => {
                error!("Error fetching {} data: {}", T::KIND, e);
                RefreshOutcome::KeptPrevious
            }
        }
    }

    /// Stop accepting fetch results. Idempotent.
    pub fn dispose(&self) {
        if !self.disposed.swap(true, Ordering::SeqCst) {
            debug!("Collections disposed");
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}
