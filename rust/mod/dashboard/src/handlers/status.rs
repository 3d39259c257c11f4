//! Status polling.

use reissue_flux::StateStore;
use tracing::{debug, info, warn};

use super::DashboardContext;
use crate::progress::{self, ProgressEvent};
use crate::state::{ProgressState, SessionState};

/// Apply one event to the progress state. Returns the new state, or `None`
/// when the event changed nothing (subscribers are not notified then).
pub fn apply(store: &StateStore, event: ProgressEvent) -> Option<ProgressState> {
    store.update::<ProgressState, _>(ProgressState::PATH, |current| {
        let next = progress::reduce(current, event);
        (next != *current).then_some(next)
    })
}

/// Fetch the status for the current student and fold it into progress.
/// Failures degrade to the safe default; nothing is retried.
pub async fn refresh(store: &StateStore, ctx: &DashboardContext) {
    let Some(register_number) = current_register_number(store) else {
        debug!("status refresh skipped: no student selected");
        return;
    };

    let generation = ctx.session.status.issue();
    info!("checking status for {}", register_number);

    let event = match ctx.api.status(&register_number).await {
        Ok(resp) => {
            if !resp.success {
                warn!("status for {} reported success=false", register_number);
            }
            ProgressEvent::StatusLoaded(resp)
        }
        Err(e) => {
            warn!("status check for {} failed: {}", register_number, e);
            ProgressEvent::StatusUnavailable
        }
    };

    apply_if_current(store, ctx, generation, event);
}

/// Follow-up fetch after an archival. A successful reply refreshes the
/// pickup flag only; the re-opened form stays open. A failed one changes
/// nothing.
pub async fn refresh_after_transfer(store: &StateStore, ctx: &DashboardContext) {
    let Some(register_number) = current_register_number(store) else {
        return;
    };

    let generation = ctx.session.status.issue();
    match ctx.api.status(&register_number).await {
        Ok(resp) if resp.success => {
            let ready = resp.details.is_ready_for_pickup;
            apply_if_current(store, ctx, generation, ProgressEvent::PickupRefreshed(ready));
        }
        Ok(_) => warn!("post-transfer status for {} reported success=false", register_number),
        Err(e) => warn!("post-transfer status for {} failed: {}", register_number, e),
    }
}

fn apply_if_current(
    store: &StateStore,
    ctx: &DashboardContext,
    generation: u64,
    event: ProgressEvent,
) {
    let applied = store.update::<ProgressState, _>(ProgressState::PATH, |current| {
        if !ctx.session.status.is_current(generation) {
            return None;
        }
        let next = progress::reduce(current, event);
        (next != *current).then_some(next)
    });

    if !ctx.session.status.is_current(generation) {
        debug!("dropped stale status reply (generation {})", generation);
    } else if let Some(state) = applied {
        debug!("progress now at step {}", state.step.index());
    }
}

pub(crate) fn current_register_number(store: &StateStore) -> Option<String> {
    store
        .get_as::<SessionState>(SessionState::PATH)
        .and_then(|s| s.register_number)
}
