//! Renderable snapshot of the whole dashboard.
//!
//! Renderers either read a [`DashboardView`] on every state change or
//! subscribe to individual state paths. The view is derived; nothing here
//! writes to the store.

use reissue_client::HistoryRequest;
use reissue_flux::StateStore;
use serde::Serialize;

use crate::progress::Step;
use crate::state::{
    EligibilityState, HistoryState, Notice, ProgressState, SessionState, SubmissionState,
    TransferState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StepStatus {
    Done,
    Current,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepView {
    pub index: u8,
    pub label: &'static str,
    pub status: StepStatus,
}

/// Ready-for-pickup banner plus the outcome of the last acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupBanner {
    /// Shown only while a card awaits pickup.
    pub visible: bool,
    /// The OK control is disabled while this is true.
    pub transferring: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryView {
    pub id: String,
    pub name: String,
    pub register_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// "Accepted on" date, or the raw timestamp when it does not parse.
    pub accepted_on: String,
}

impl From<&HistoryRequest> for HistoryEntryView {
    fn from(r: &HistoryRequest) -> Self {
        Self {
            id: r.id.clone(),
            name: r.name.clone(),
            register_number: r.register_number.clone(),
            reason: (!r.reason.is_empty()).then(|| r.reason.clone()),
            accepted_on: r
                .accepted_on()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| r.created_at.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryView {
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub entries: Vec<HistoryEntryView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub register_number: Option<String>,
    pub steps: Vec<StepView>,
    pub current_step: u8,
    pub form_disabled: bool,
    pub button_text: String,
    pub printing_active: bool,
    pub pickup: PickupBanner,
    pub history: HistoryView,
    pub submission: SubmissionState,
    pub eligibility: EligibilityState,
}

impl DashboardView {
    /// Build a view from whatever is currently stored. Missing states read
    /// as their defaults.
    pub fn from_store(store: &StateStore) -> Self {
        let session = store
            .get_as::<SessionState>(SessionState::PATH)
            .unwrap_or_default();
        let progress = store
            .get_as::<ProgressState>(ProgressState::PATH)
            .unwrap_or_default();
        let transfer = store
            .get_as::<TransferState>(TransferState::PATH)
            .unwrap_or_default();
        let history = store
            .get_as::<HistoryState>(HistoryState::PATH)
            .unwrap_or_default();
        let submission = store
            .get_as::<SubmissionState>(SubmissionState::PATH)
            .unwrap_or_default();

        Self {
            register_number: session.register_number,
            steps: steps(progress.step),
            current_step: progress.step.index(),
            form_disabled: !progress.form_open() || submission.busy,
            button_text: progress.button_text.clone(),
            printing_active: progress.printing_active,
            pickup: PickupBanner {
                visible: progress.ready_for_pickup,
                transferring: transfer.busy,
                notice: transfer.notice,
            },
            history: HistoryView {
                loading: history.loading,
                error: history.error,
                entries: history.items.iter().map(HistoryEntryView::from).collect(),
            },
            submission,
            eligibility: store
                .get_as::<EligibilityState>(EligibilityState::PATH)
                .unwrap_or_default(),
        }
    }
}

fn steps(current: Step) -> Vec<StepView> {
    Step::ALL
        .iter()
        .map(|&step| StepView {
            index: step.index(),
            label: step.label(),
            status: match step.cmp(&current) {
                std::cmp::Ordering::Less => StepStatus::Done,
                std::cmp::Ordering::Equal => StepStatus::Current,
                std::cmp::Ordering::Greater => StepStatus::Pending,
            },
        })
        .collect()
}
