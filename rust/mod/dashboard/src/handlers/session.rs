//! Identity changes and teardown.

use reissue_flux::StateStore;
use tracing::info;

use super::{history, status, DashboardContext};
use crate::request::OpenSessionReq;
use crate::state::{
    EligibilityState, HistoryState, ProgressState, SessionState, SubmissionState, TransferState,
};

/// Switch to a new student. Everything tied to the previous identity is
/// discarded before the status and history fetches start.
pub async fn handle_open(req: &OpenSessionReq, store: &StateStore, ctx: &DashboardContext) {
    let epoch = ctx.session.begin();
    match &req.register_number {
        Some(id) => info!("session {} opened for {}", epoch, id),
        None => info!("session {} opened without a student", epoch),
    }

    store.set(
        SessionState::PATH,
        SessionState {
            register_number: req.register_number.clone(),
            history: req.history.clone(),
            epoch,
        },
    );
    store.set(ProgressState::PATH, ProgressState::default());
    store.set(TransferState::PATH, TransferState::default());
    store.set(SubmissionState::PATH, SubmissionState::default());
    store.set(EligibilityState::PATH, EligibilityState::default());

    if req.register_number.is_none() {
        store.set(HistoryState::PATH, HistoryState::default());
        return;
    }

    status::refresh(store, ctx).await;
    if ctx.session.is_current(epoch) {
        history::load(store, ctx).await;
    }
}

/// Cancel the review timer and make every in-flight reply stale. Busy flags
/// are cleared here since the dropped replies will never clear them.
pub fn handle_close(store: &StateStore, ctx: &DashboardContext) {
    let epoch = ctx.session.close();
    store.set(TransferState::PATH, TransferState::default());
    store.set(SubmissionState::PATH, SubmissionState::default());
    store.update::<SessionState, _>(SessionState::PATH, |s| {
        Some(SessionState {
            register_number: None,
            epoch,
            ..s.clone()
        })
    });
    info!("session closed (epoch {})", epoch);
}
