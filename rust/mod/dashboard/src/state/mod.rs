//! Dashboard state definitions.
//!
//! Each file defines the state stored at one well-known path. Renderers read
//! these through `Flux::get_as` or subscribe to their paths.

pub mod form;
pub mod history;
pub mod pickup;
pub mod progress;
pub mod session;

use serde::{Deserialize, Serialize};

pub use form::{EligibilityState, SubmissionState};
pub use history::HistoryState;
pub use pickup::TransferState;
pub use progress::ProgressState;
pub use session::SessionState;

/// One-shot message shown next to an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub success: bool,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            success: true,
            text: text.into(),
        }
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            success: false,
            text: text.into(),
        }
    }
}
