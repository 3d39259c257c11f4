//! Session lifetime: identity epochs, fetch generations, and the
//! cancellation scope for timers started on behalf of a student.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Monotonic counter for one kind of fetch. Only the most recently issued
/// generation may write its result.
#[derive(Debug, Default)]
pub struct Generation(AtomicU64);

impl Generation {
    /// Start a new fetch; every earlier generation becomes stale.
    pub fn issue(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.0.load(Ordering::SeqCst) == generation
    }
}

/// Per-dashboard session bookkeeping.
///
/// `begin` starts a new identity epoch: it invalidates all in-flight
/// fetches and cancels the timers of the previous epoch. `shutdown`
/// cancels the root token, after which no new scope is ever live.
pub struct SessionControl {
    epoch: AtomicU64,
    pub status: Generation,
    pub history: Generation,
    root: CancellationToken,
    scope: Mutex<CancellationToken>,
}

impl SessionControl {
    pub fn new() -> Self {
        let root = CancellationToken::new();
        let scope = Mutex::new(root.child_token());
        Self {
            epoch: AtomicU64::new(0),
            status: Generation::default(),
            history: Generation::default(),
            root,
            scope,
        }
    }

    pub fn begin(&self) -> u64 {
        let fresh = self.root.child_token();
        let previous = std::mem::replace(
            &mut *self.scope.lock().unwrap_or_else(|e| e.into_inner()),
            fresh,
        );
        previous.cancel();
        self.status.issue();
        self.history.issue();
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("session epoch {}", epoch);
        epoch
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, epoch: u64) -> bool {
        self.epoch() == epoch
    }

    /// Token cancelled when the current epoch ends.
    pub fn scope(&self) -> CancellationToken {
        self.scope
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// End the current epoch without starting a new identity.
    pub fn close(&self) -> u64 {
        self.begin()
    }

    pub fn shutdown(&self) {
        self.root.cancel();
    }
}

impl Default for SessionControl {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_generation_is_current() {
        let counter = Generation::default();
        let first = counter.issue();
        let second = counter.issue();
        assert!(!counter.is_current(first));
        assert!(counter.is_current(second));
    }

    #[test]
    fn begin_invalidates_fetches_and_cancels_scope() {
        let session = SessionControl::new();
        let epoch = session.begin();
        let status = session.status.issue();
        let history = session.history.issue();
        let scope = session.scope();

        let next = session.begin();
        assert_eq!(next, epoch + 1);
        assert!(!session.is_current(epoch));
        assert!(!session.status.is_current(status));
        assert!(!session.history.is_current(history));
        assert!(scope.is_cancelled());
        assert!(!session.scope().is_cancelled());
    }

    #[test]
    fn shutdown_cancels_live_scope() {
        let session = SessionControl::new();
        session.begin();
        let scope = session.scope();
        session.shutdown();
        assert!(scope.is_cancelled());
        // Scopes created afterwards are born cancelled.
        session.begin();
        assert!(session.scope().is_cancelled());
    }
}
