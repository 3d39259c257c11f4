//! Eligibility smoke test against a running backend.
//!
//! Only students with a prior accepted or rejected decision may apply;
//! students unknown to the backend, or with a request still pending, may not.

use anyhow::Result;
use reissue_client::{ApiError, ReissueApi, ReissueForm};
use serde::Serialize;
use tracing::warn;

use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Success,
    Fail,
}

pub struct Case {
    pub register_number: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub expected: Outcome,
}

pub const CASES: [Case; 4] = [
    Case {
        register_number: "ELIGIBLE001",
        name: "Eligible Student 1",
        description: "Student with an accepted card",
        expected: Outcome::Success,
    },
    Case {
        register_number: "ELIGIBLE002",
        name: "Eligible Student 2",
        description: "Student with a rejected request",
        expected: Outcome::Success,
    },
    Case {
        register_number: "NOT_ELIGIBLE001",
        name: "Not Eligible Student 1",
        description: "Student unknown to the backend",
        expected: Outcome::Fail,
    },
    Case {
        register_number: "PENDING001",
        name: "Pending Student 1",
        description: "Student with a pending request",
        expected: Outcome::Fail,
    },
];

impl Case {
    pub fn form(&self) -> ReissueForm {
        ReissueForm {
            register_number: self.register_number.to_string(),
            name: self.name.to_string(),
            department: "Computer Science Engineering".to_string(),
            year: "3".to_string(),
            section: "A".to_string(),
            reason: "Test reason".to_string(),
            dob: "2000-01-01".to_string(),
            library_code: "LIB001".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseReport {
    pub register_number: String,
    pub description: String,
    pub eligible: Option<bool>,
    pub eligibility_message: String,
    pub expected: Outcome,
    /// `None` when the submission never got an HTTP answer.
    pub actual: Option<Outcome>,
    pub message: String,
    pub passed: bool,
}

/// Run one case: check eligibility (informational), then submit and compare
/// the HTTP outcome with the expectation.
pub async fn run_case(api: &dyn ReissueApi, case: &Case) -> CaseReport {
    let (eligible, eligibility_message) = match api.check_eligibility(case.register_number).await {
        Ok(r) => (Some(r.eligible), r.message),
        Err(e) => {
            warn!("eligibility check for {} failed: {}", case.register_number, e);
            (None, e.to_string())
        }
    };

    let (actual, message) = match api.submit_request(&case.form()).await {
        Ok(resp) => (Some(Outcome::Success), resp.message),
        Err(ApiError::Server { message, .. }) => (Some(Outcome::Fail), message),
        Err(e) => (None, e.to_string()),
    };

    CaseReport {
        register_number: case.register_number.to_string(),
        description: case.description.to_string(),
        eligible,
        eligibility_message,
        expected: case.expected,
        actual,
        message,
        passed: actual == Some(case.expected),
    }
}

pub async fn run_all(api: &dyn ReissueApi) -> Vec<CaseReport> {
    let mut reports = Vec::with_capacity(CASES.len());
    for case in &CASES {
        reports.push(run_case(api, case).await);
    }
    reports
}

pub async fn validate(server: &str, as_json: bool) -> Result<()> {
    let client = super::client(server)?;
    if let Err(e) = client.health().await {
        anyhow::bail!(
            "Server at {} is not running ({}). Start the backend first.",
            client.base_url(),
            e
        );
    }
    if !as_json {
        println!("Server is running at {}.", client.base_url());
    }

    let reports = run_all(&*client).await;
    if as_json {
        render::json(&reports)?;
    } else {
        print_reports(&reports);
    }

    let failed = reports.iter().filter(|r| !r.passed).count();
    if failed > 0 {
        anyhow::bail!("{} of {} validation cases failed", failed, reports.len());
    }
    Ok(())
}

fn print_reports(reports: &[CaseReport]) {
    for (i, r) in reports.iter().enumerate() {
        println!();
        println!("Test {}: {} ({})", i + 1, r.description, r.register_number);
        let eligibility = match r.eligible {
            Some(true) => "eligible",
            Some(false) => "not eligible",
            None => "unknown",
        };
        println!("  Eligibility: {} - {}", eligibility, r.eligibility_message);
        let actual = match r.actual {
            Some(Outcome::Success) => "success".to_string(),
            Some(Outcome::Fail) => format!("failed - {}", r.message),
            None => format!("error - {}", r.message),
        };
        println!("  Submission:  {}", actual);
        println!("  Result:      {}", if r.passed { "PASSED" } else { "FAILED" });
    }

    let passed = reports.iter().filter(|r| r.passed).count();
    println!();
    println!("{}/{} cases passed.", passed, reports.len());
}
