//! Request progress as one tagged state plus a single reducer.
//!
//! The server reports four statuses; the dashboard shows five steps.
//! `Submitted` exists only on the client, between a successful submission
//! and the end of the review delay (or the next status fetch).

use reissue_client::{RequestStatus, StatusResponse};
use serde::{Deserialize, Serialize};

use crate::state::ProgressState;

/// Button label used whenever the server has not supplied one.
pub const DEFAULT_BUTTON_TEXT: &str = "Submit Request";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Step {
    #[default]
    NotStarted,
    Submitted,
    UnderReview,
    ApprovedPrinting,
    ReadyForPickup,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::NotStarted,
        Step::Submitted,
        Step::UnderReview,
        Step::ApprovedPrinting,
        Step::ReadyForPickup,
    ];

    /// Position on the progress indicator, 0 through 4.
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Step::NotStarted => "Not Started",
            Step::Submitted => "Request Submitted",
            Step::UnderReview => "Under Review",
            Step::ApprovedPrinting => "Approved & Printing",
            Step::ReadyForPickup => "Ready for Pickup",
        }
    }

    /// Map a server status to a step. Never yields `Submitted`.
    pub fn for_status(status: RequestStatus) -> Step {
        match status {
            RequestStatus::UnderReview => Step::UnderReview,
            RequestStatus::ApprovedPrinting => Step::ApprovedPrinting,
            RequestStatus::ReadyPickup => Step::ReadyForPickup,
            RequestStatus::None | RequestStatus::Unknown => Step::NotStarted,
        }
    }
}

/// Everything that can move the progress state.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// A status reply arrived. `success:false` replies count as unavailable.
    StatusLoaded(StatusResponse),
    /// The status fetch failed outright.
    StatusUnavailable,
    /// The student submitted a request.
    Submitted,
    /// The optimistic review delay ran out.
    ReviewDelayElapsed,
    /// The accepted card was archived; the student may apply again.
    TransferConfirmed,
    /// Post-transfer status reply. Only the pickup flag is taken from it.
    PickupRefreshed(bool),
}

/// The single transition function for [`ProgressState`].
pub fn reduce(state: &ProgressState, event: ProgressEvent) -> ProgressState {
    match event {
        ProgressEvent::StatusLoaded(resp) if resp.success => ProgressState {
            step: Step::for_status(resp.status),
            form_enabled: resp.form_enabled,
            button_text: if resp.button_text.is_empty() {
                DEFAULT_BUTTON_TEXT.to_string()
            } else {
                resp.button_text
            },
            printing_active: resp.details.is_printing,
            ready_for_pickup: resp.details.is_ready_for_pickup,
        },
        ProgressEvent::StatusLoaded(_) | ProgressEvent::StatusUnavailable => {
            ProgressState::fallback()
        }
        ProgressEvent::Submitted => {
            if state.printing_active {
                state.clone()
            } else {
                ProgressState {
                    step: Step::Submitted,
                    ..state.clone()
                }
            }
        }
        ProgressEvent::ReviewDelayElapsed => {
            if state.printing_active || state.step != Step::Submitted {
                state.clone()
            } else {
                ProgressState {
                    step: Step::UnderReview,
                    ..state.clone()
                }
            }
        }
        ProgressEvent::TransferConfirmed => ProgressState {
            step: Step::NotStarted,
            form_enabled: true,
            printing_active: false,
            ..state.clone()
        },
        ProgressEvent::PickupRefreshed(ready) => ProgressState {
            ready_for_pickup: ready,
            ..state.clone()
        },
    }
}
