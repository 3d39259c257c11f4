//! Pickup acknowledgement: archive the accepted card, then re-check status.

use reissue_flux::StateStore;
use tracing::{debug, info, warn};

use super::{status, DashboardContext};
use crate::progress::ProgressEvent;
use crate::state::pickup::{TRANSFER_ERROR, TRANSFER_FAILED};
use crate::state::{Notice, ProgressState, TransferState};

pub async fn handle_acknowledge(store: &StateStore, ctx: &DashboardContext) {
    let Some(register_number) = status::current_register_number(store) else {
        debug!("pickup acknowledged with no student selected");
        return;
    };
    let ready = store
        .get_as::<ProgressState>(ProgressState::PATH)
        .is_some_and(|p| p.ready_for_pickup);
    if !ready {
        debug!("pickup acknowledged but nothing is ready for {}", register_number);
        return;
    }

    // Claim the transfer; a second press while busy does nothing.
    let claimed = store.update::<TransferState, _>(TransferState::PATH, |t| {
        (!t.busy).then_some(TransferState {
            busy: true,
            notice: None,
        })
    });
    if claimed.is_none() {
        debug!("transfer for {} already in flight", register_number);
        return;
    }

    let epoch = ctx.session.epoch();
    info!("transferring accepted card of {} to history", register_number);

    let (confirmed, notice) = match ctx.api.transfer_to_history(&register_number).await {
        Ok(resp) if resp.success => {
            info!(
                "transferred {} record(s) for {}",
                resp.transferred_count, register_number
            );
            (true, Notice::success(resp.message))
        }
        Ok(resp) => {
            warn!("transfer for {} refused: {}", register_number, resp.message);
            let text = if resp.message.is_empty() {
                TRANSFER_FAILED.to_string()
            } else {
                resp.message
            };
            (false, Notice::failure(text))
        }
        Err(e) => {
            warn!("transfer for {} failed: {}", register_number, e);
            (false, Notice::failure(TRANSFER_ERROR))
        }
    };

    if !ctx.session.is_current(epoch) {
        debug!("dropped transfer reply from epoch {}", epoch);
        return;
    }

    store.set(
        TransferState::PATH,
        TransferState {
            busy: false,
            notice: Some(notice),
        },
    );

    if confirmed {
        status::apply(store, ProgressEvent::TransferConfirmed);
        status::refresh_after_transfer(store, ctx).await;
    }
}
