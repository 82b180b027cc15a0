//! Tri-state view model over an `AmphibiansRepository`.
//!
//! # Design
//! The state lives in a `tokio::sync::watch` channel: readers always see a
//! whole `ViewState`, and subscribers are woken on every transition. Each
//! fetch is a task spawned on the runtime handle captured at construction,
//! so `retry` can be called from any thread.
//!
//! Overlapping fetches are not coordinated. Whichever completes last writes
//! last. Dropping the view model marks the state torn down under the watch
//! lock before aborting the tasks it spawned, so a fetch finishing during
//! teardown cannot write.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};

use crate::error::FetchError;
use crate::repository::AmphibiansRepository;
use crate::types::Amphibian;

/// What the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Loading,
    Success(Vec<Amphibian>),
    Error,
}

/// Completion of one fetch. Resolves to `Err` only for failures the view
/// model does not handle (anything other than a connectivity error); in that
/// case the state is left as it was.
pub type FetchHandle = JoinHandle<Result<(), FetchError>>;

struct SharedState {
    state: watch::Sender<ViewState>,
    torn_down: AtomicBool,
}

impl SharedState {
    /// Replace the state unless teardown has started. The flag is read while
    /// the watch lock is held, which orders it against `tear_down`.
    fn publish(&self, next: ViewState) -> bool {
        self.state.send_if_modified(|current| {
            if self.torn_down.load(Ordering::Acquire) {
                return false;
            }
            *current = next;
            true
        })
    }

    fn tear_down(&self) {
        self.state.send_if_modified(|_| {
            self.torn_down.store(true, Ordering::Release);
            false
        });
    }
}

pub struct AmphibiansViewModel {
    repository: Arc<dyn AmphibiansRepository>,
    shared: Arc<SharedState>,
    runtime: Handle,
    in_flight: Mutex<Vec<AbortHandle>>,
}

impl AmphibiansViewModel {
    /// Create the view model on the current tokio runtime and start the
    /// initial fetch. The state is `Loading` until that fetch resolves.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn new(repository: Arc<dyn AmphibiansRepository>) -> Self {
        Self::launch(repository, Handle::current()).0
    }

    /// Create the view model with fetches running on `runtime`, returning the
    /// handle of the initial fetch alongside it.
    pub fn launch(repository: Arc<dyn AmphibiansRepository>, runtime: Handle) -> (Self, FetchHandle) {
        let (state, _) = watch::channel(ViewState::Loading);
        let view_model = Self {
            repository,
            shared: Arc::new(SharedState {
                state,
                torn_down: AtomicBool::new(false),
            }),
            runtime,
            in_flight: Mutex::new(Vec::new()),
        };
        let initial = view_model.retry();
        (view_model, initial)
    }

    pub fn current_state(&self) -> ViewState {
        self.shared.state.borrow().clone()
    }

    /// Receiver that observes every state change from now on.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.shared.state.subscribe()
    }

    /// Start another fetch. The current state stays visible until it
    /// resolves; fetches already in flight keep running.
    pub fn retry(&self) -> FetchHandle {
        let repository = Arc::clone(&self.repository);
        let shared = Arc::clone(&self.shared);

        let handle = self.runtime.spawn(async move {
            let next = match repository.fetch_all().await {
                Ok(amphibians) => {
                    tracing::info!(count = amphibians.len(), "amphibians loaded");
                    ViewState::Success(amphibians)
                }
                Err(FetchError::Connectivity(err)) => {
                    tracing::warn!(error = %err, "fetching amphibians failed");
                    ViewState::Error
                }
                Err(err) => {
                    tracing::error!(error = %err, "unhandled failure fetching amphibians");
                    return Err(err);
                }
            };
            if !shared.publish(next) {
                tracing::debug!("view model torn down, dropping fetch result");
            }
            Ok(())
        });

        let mut in_flight = self.in_flight.lock();
        in_flight.retain(|h| !h.is_finished());
        in_flight.push(handle.abort_handle());
        handle
    }
}

impl Drop for AmphibiansViewModel {
    fn drop(&mut self) {
        self.shared.tear_down();
        for handle in self.in_flight.get_mut().drain(..) {
            handle.abort();
        }
    }
}
