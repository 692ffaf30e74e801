//! Generation-tagged load tracking
//!
//! A [`LoadTracker`] owns one [`LoadState`] and a generation counter. Every
//! trigger takes a [`Ticket`] for a fresh generation and enters `Loading`
//! immediately. A result commits only while its ticket is still the latest,
//! so a slow earlier request can never overwrite a newer one. A reset bumps
//! the generation as well, which turns every in-flight ticket stale.
//!
//! Observers either read [`LoadTracker::state`] or subscribe to the watch
//! channel behind it.

use crate::load_state::{validate_transition, LoadState, Phase};
use futures::Stream;
use parking_lot::Mutex;
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Proof of one trigger; redeemed by [`LoadTracker::complete`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    #[inline]
    #[must_use]
    pub fn generation(self) -> u64 {
        self.0
    }
}

struct Inner<T> {
    name: &'static str,
    generation: Mutex<u64>,
    state: watch::Sender<LoadState<T>>,
}

/// Tracker for one flow; clones share the same state
pub struct LoadTracker<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for LoadTracker<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> LoadTracker<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create an idle tracker; `name` labels its log events
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        let (state, _) = watch::channel(LoadState::Idle);
        Self {
            inner: Arc::new(Inner {
                name,
                generation: Mutex::new(0),
                state,
            }),
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    /// Current state snapshot
    #[must_use]
    pub fn state(&self) -> LoadState<T> {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.inner.state.borrow().phase()
    }

    /// Latest generation handed out
    #[must_use]
    pub fn generation(&self) -> u64 {
        *self.inner.generation.lock()
    }

    /// Receiver that sees every committed state
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoadState<T>> {
        self.inner.state.subscribe()
    }

    /// Stream of states, starting with the current one
    pub fn updates(&self) -> impl Stream<Item = LoadState<T>> + Send + 'static {
        let rx = self.subscribe();
        futures::stream::unfold((rx, true), |(mut rx, first)| async move {
            if !first && rx.changed().await.is_err() {
                return None;
            }
            let state = rx.borrow_and_update().clone();
            Some((state, (rx, false)))
        })
    }

    /// Start a new generation and enter `Loading`
    pub fn begin(&self) -> Ticket {
        let mut generation = self.inner.generation.lock();
        *generation += 1;
        self.inner.state.send_replace(LoadState::Loading);
        tracing::debug!(flow = self.inner.name, generation = *generation, "load started");
        Ticket(*generation)
    }

    /// Commit the outcome of `ticket`
    ///
    /// Returns `false`, leaving the state untouched, when the ticket is stale
    /// or was already redeemed.
    pub fn complete(&self, ticket: Ticket, outcome: Result<T, String>) -> bool {
        let generation = self.inner.generation.lock();
        if ticket.0 != *generation {
            tracing::warn!(
                flow = self.inner.name,
                stale = ticket.0,
                current = *generation,
                "discarding stale result"
            );
            return false;
        }

        let next = LoadState::from(outcome);
        let from = self.phase();
        if let Err(err) = validate_transition(from, next.phase()) {
            tracing::debug!(flow = self.inner.name, error = %err, "ticket already redeemed");
            return false;
        }

        match &next {
            LoadState::Failed(message) => {
                tracing::info!(flow = self.inner.name, generation = ticket.0, %message, "load failed");
            }
            _ => tracing::debug!(flow = self.inner.name, generation = ticket.0, "load committed"),
        }
        self.inner.state.send_replace(next);
        true
    }

    /// Return to `Idle`; in-flight results become stale
    pub fn reset(&self) {
        let mut generation = self.inner.generation.lock();
        *generation += 1;
        self.inner.state.send_replace(LoadState::Idle);
        tracing::debug!(flow = self.inner.name, generation = *generation, "reset");
    }

    /// Begin now, then await `work` and commit its outcome
    ///
    /// `Loading` is entered before the returned future is first polled.
    pub fn run<F>(&self, work: F) -> impl Future<Output = bool> + Send + 'static
    where
        F: Future<Output = Result<T, String>> + Send + 'static,
    {
        let ticket = self.begin();
        let tracker = self.clone();
        async move {
            let outcome = work.await;
            tracker.complete(ticket, outcome)
        }
    }

    /// Like [`run`](Self::run), spawned on the current tokio runtime
    ///
    /// The handle resolves to whether the outcome was committed.
    pub fn trigger<F>(&self, work: F) -> JoinHandle<bool>
    where
        F: Future<Output = Result<T, String>> + Send + 'static,
    {
        tokio::spawn(self.run(work))
    }
}

impl<T> Debug for LoadTracker<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadTracker")
            .field("name", &self.inner.name)
            .field("generation", &*self.inner.generation.lock())
            .finish_non_exhaustive()
    }
}
