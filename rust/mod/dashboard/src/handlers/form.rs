//! Request submission and the eligibility check.

use std::sync::Arc;

use reissue_flux::StateStore;
use tracing::{debug, info, warn};

use super::{status, DashboardContext};
use crate::progress::{self, ProgressEvent, Step};
use crate::request::{CheckEligibilityReq, SubmitFormReq};
use crate::state::form::{ELIGIBILITY_ERROR, FORM_CLOSED, SUBMIT_ERROR};
use crate::state::{EligibilityState, Notice, ProgressState, SubmissionState};

pub async fn handle_submit(
    req: &SubmitFormReq,
    store: &Arc<StateStore>,
    ctx: &Arc<DashboardContext>,
) {
    let progress = store
        .get_as::<ProgressState>(ProgressState::PATH)
        .unwrap_or_default();
    if !progress.form_open() {
        warn!(
            "submission for {} rejected: form closed at step {}",
            req.form.register_number,
            progress.step.index()
        );
        store.set(
            SubmissionState::PATH,
            SubmissionState {
                busy: false,
                notice: Some(Notice::failure(FORM_CLOSED)),
            },
        );
        return;
    }

    // Claim the submission; a second submit while one is in flight does nothing.
    let claimed = store.update::<SubmissionState, _>(SubmissionState::PATH, |s| {
        (!s.busy).then_some(SubmissionState {
            busy: true,
            notice: None,
        })
    });
    if claimed.is_none() {
        debug!("submission for {} already in flight", req.form.register_number);
        return;
    }

    let epoch = ctx.session.epoch();
    let result = ctx.api.submit_request(&req.form).await;
    if !ctx.session.is_current(epoch) {
        debug!("dropped submission reply from epoch {}", epoch);
        return;
    }

    let (accepted, notice) = match result {
        Ok(resp) if resp.success => {
            info!("submitted reissue request for {}", req.form.register_number);
            (true, Notice::success(resp.message))
        }
        Ok(resp) => {
            warn!("submission rejected: {}", resp.message);
            (false, Notice::failure(non_empty_or(resp.message, SUBMIT_ERROR)))
        }
        Err(e) => {
            warn!("submission for {} failed: {}", req.form.register_number, e);
            let text = e.server_message().unwrap_or(SUBMIT_ERROR).to_string();
            (false, Notice::failure(text))
        }
    };

    store.set(
        SubmissionState::PATH,
        SubmissionState {
            busy: false,
            notice: Some(notice),
        },
    );

    if accepted {
        begin_optimistic_review(store, ctx);
    }
}

/// Show "Request Submitted" now and "Under Review" once the review delay
/// runs out. The delay belongs to the current epoch and dies with it.
pub fn begin_optimistic_review(store: &Arc<StateStore>, ctx: &Arc<DashboardContext>) {
    status::apply(store, ProgressEvent::Submitted);

    let step = store
        .get_as::<ProgressState>(ProgressState::PATH)
        .map(|s| s.step)
        .unwrap_or_default();
    if step != Step::Submitted {
        debug!("printing in progress; step stays at {}", step.index());
        return;
    }

    let epoch = ctx.session.epoch();
    let scope = ctx.session.scope();
    let delay = ctx.config.review_delay;
    let store = Arc::clone(store);
    let ctx = Arc::clone(ctx);

    tokio::spawn(async move {
        tokio::select! {
            _ = scope.cancelled() => {
                debug!("review delay cancelled (epoch {})", epoch);
            }
            _ = tokio::time::sleep(delay) => {
                store.update::<ProgressState, _>(ProgressState::PATH, |current| {
                    if !ctx.session.is_current(epoch) {
                        return None;
                    }
                    let next = progress::reduce(current, ProgressEvent::ReviewDelayElapsed);
                    (next != *current).then_some(next)
                });
            }
        }
    });
}

pub async fn handle_check_eligibility(
    req: &CheckEligibilityReq,
    store: &StateStore,
    ctx: &DashboardContext,
) {
    let epoch = ctx.session.epoch();
    store.set(
        EligibilityState::PATH,
        EligibilityState {
            checking: true,
            ..Default::default()
        },
    );

    let next = match ctx.api.check_eligibility(&req.register_number).await {
        Ok(resp) => {
            info!(
                "eligibility for {}: {} ({})",
                req.register_number, resp.eligible, resp.message
            );
            EligibilityState {
                checking: false,
                eligible: Some(resp.eligible),
                message: (!resp.message.is_empty()).then_some(resp.message),
            }
        }
        Err(e) => {
            warn!("eligibility check for {} failed: {}", req.register_number, e);
            EligibilityState {
                checking: false,
                eligible: None,
                message: Some(e.server_message().unwrap_or(ELIGIBILITY_ERROR).to_string()),
            }
        }
    };

    if ctx.session.is_current(epoch) {
        store.set(EligibilityState::PATH, next);
    } else {
        debug!("dropped eligibility reply from epoch {}", epoch);
    }
}

fn non_empty_or(message: String, fallback: &str) -> String {
    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
