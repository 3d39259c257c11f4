//! Progress state, stored at `progress/state`.

use serde::{Deserialize, Serialize};

use crate::progress::{Step, DEFAULT_BUTTON_TEXT};

/// Request progress as shown on the tracker. Only `progress::reduce`
/// produces new values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressState {
    pub step: Step,
    pub form_enabled: bool,
    pub button_text: String,
    pub printing_active: bool,
    pub ready_for_pickup: bool,
}

impl ProgressState {
    pub const PATH: &'static str = "progress/state";

    /// Safe state after a failed status fetch: nothing in progress, form open.
    pub fn fallback() -> Self {
        Self {
            form_enabled: true,
            ..Self::default()
        }
    }

    /// The submission form accepts input only with nothing in progress and
    /// the server allowing it.
    pub fn form_open(&self) -> bool {
        self.step == Step::NotStarted && self.form_enabled
    }
}

impl Default for ProgressState {
    /// Before the first status reply the form stays closed.
    fn default() -> Self {
        Self {
            step: Step::NotStarted,
            form_enabled: false,
            button_text: DEFAULT_BUTTON_TEXT.to_string(),
            printing_active: false,
            ready_for_pickup: false,
        }
    }
}
