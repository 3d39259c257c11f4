//! Submission form requests.

use reissue_client::ReissueForm;

/// Submit a new reissue request.
#[derive(Debug, Clone)]
pub struct SubmitFormReq {
    pub form: ReissueForm,
}

impl SubmitFormReq {
    pub const PATH: &'static str = "form/submit";
}

#[derive(Debug, Clone)]
pub struct CheckEligibilityReq {
    pub register_number: String,
}

impl CheckEligibilityReq {
    pub const PATH: &'static str = "form/check-eligibility";
}
