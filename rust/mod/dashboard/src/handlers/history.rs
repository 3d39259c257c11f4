//! Previous-requests list.

use reissue_client::HistoryRequest;
use reissue_flux::StateStore;
use tracing::{debug, info, warn};

use super::DashboardContext;
use crate::request::SupplyHistoryReq;
use crate::state::history::LOAD_ERROR;
use crate::state::{HistoryState, SessionState};

/// Accepted records first, then the supplied history. Duplicates are kept.
pub fn merge(accepted: Vec<HistoryRequest>, supplied: &[HistoryRequest]) -> Vec<HistoryRequest> {
    let mut items = accepted;
    items.extend_from_slice(supplied);
    items
}

/// Fetch accepted records and rebuild the list.
pub async fn load(store: &StateStore, ctx: &DashboardContext) {
    let Some(session) = store.get_as::<SessionState>(SessionState::PATH) else {
        return;
    };
    let Some(register_number) = session.register_number else {
        debug!("history load skipped: no student selected");
        return;
    };

    let generation = ctx.session.history.issue();
    store.set(HistoryState::PATH, HistoryState::loading());

    let next = match ctx.api.accepted_requests(&register_number).await {
        Ok(accepted) => {
            info!(
                "loaded {} accepted and {} archived requests for {}",
                accepted.len(),
                session.history.len(),
                register_number
            );
            HistoryState::loaded(merge(accepted, &session.history))
        }
        Err(e) => {
            warn!("loading accepted requests for {} failed: {}", register_number, e);
            HistoryState::failed(LOAD_ERROR)
        }
    };

    let written = store.update::<HistoryState, _>(HistoryState::PATH, |_| {
        ctx.session.history.is_current(generation).then_some(next)
    });
    if written.is_none() {
        debug!("dropped stale history reply (generation {})", generation);
    }
}

/// Replace the supplied history. The list is rebuilt only when a different
/// list arrives; handing back the same `Arc` is a no-op.
pub async fn handle_supply(req: &SupplyHistoryReq, store: &StateStore, ctx: &DashboardContext) {
    let changed = store
        .update::<SessionState, _>(SessionState::PATH, |s| {
            (!std::sync::Arc::ptr_eq(&s.history, &req.history)).then(|| SessionState {
                history: req.history.clone(),
                ..s.clone()
            })
        })
        .is_some();

    if changed {
        load(store, ctx).await;
    }
}
