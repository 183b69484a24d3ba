use super::state::DashboardState;
use crate::services::ResourceLoader;
use std::sync::Arc;
use tokio::sync::watch;

/// Holds the latest dashboard snapshot and reloads it on demand.
///
/// Every [`refresh`](DashboardStore::refresh) runs a full load and publishes
/// all five slices in a single update. Overlapping refreshes are not
/// cancelled or ordered: whichever load settles last overwrites the
/// snapshot, even if it was started first. `generation` records the order in
/// which snapshots were applied.
#[derive(Clone)]
pub struct DashboardStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    loader: ResourceLoader,
    state: watch::Sender<DashboardState>,
}

impl DashboardStore {
    /// Creates the store and starts the initial load on the current tokio
    /// runtime. Must be called from within a runtime.
    pub fn new(loader: ResourceLoader) -> Self {
        let store = Self::idle(loader);
        let initial = store.clone();
        tokio::spawn(async move {
            initial.refresh().await;
        });
        store
    }

    /// Creates the store with default slices and no load in flight.
    pub fn idle(loader: ResourceLoader) -> Self {
        let (state, _) = watch::channel(DashboardState::default());
        Self {
            inner: Arc::new(StoreInner {
                loader,
                state,
            }),
        }
    }

    pub fn snapshot(&self) -> DashboardState {
        self.inner.state.borrow().clone()
    }

    /// Receiver that is notified each time a load cycle is applied.
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.inner.state.subscribe()
    }

    /// Waits until at least `generation` cycles have been applied.
    pub async fn wait_for_generation(&self, generation: u64) -> DashboardState {
        let mut receiver = self.subscribe();
        let state = match receiver.wait_for(|state| state.generation >= generation).await {
            Ok(state) => state.clone(),
            Err(_) => self.snapshot(),
        };
        state
    }

    /// Reloads every resource and replaces the snapshot with the outcome.
    /// Returns the snapshot this call applied.
    pub async fn refresh(&self) -> DashboardState {
        let bundle = self.inner.loader.load().await;

        // The generation is derived under the channel's write lock so that
        // published generations never go backwards.
        let mut state = DashboardState::default();
        self.inner.state.send_modify(|current| {
            *current = DashboardState::from_bundle(bundle, current.generation + 1);
            state = current.clone();
        });
        let generation = state.generation;

        let failed = state.failed_kinds();
        if failed.is_empty() {
            log::debug!("Applied dashboard generation {generation}");
        } else {
            log::info!(
                "Applied dashboard generation {generation} with {} failed resource(s)",
                failed.len()
            );
        }
        state
    }
}
