//! Scripted in-memory backend for handler and dashboard tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use reissue_client::{
    ApiError, EligibilityResponse, HistoryRequest, ReissueApi, ReissueForm, StatusResponse,
    SubmitResponse, TransferResponse,
};
use tokio::sync::Notify;

/// Unscripted calls fail with a 500. A gated call waits for one
/// `notify_one` on its gate before answering.
#[derive(Default)]
pub(crate) struct FakeApi {
    statuses: Mutex<HashMap<String, StatusResponse>>,
    accepted: Mutex<HashMap<String, Vec<HistoryRequest>>>,
    transfers: Mutex<HashMap<String, TransferResponse>>,
    submit: Mutex<Option<Result<SubmitResponse, (u16, String)>>>,
    eligibility: Mutex<HashMap<String, EligibilityResponse>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_status(&self, id: &str, resp: StatusResponse) {
        lock(&self.statuses).insert(id.to_string(), resp);
    }

    pub fn clear_status(&self, id: &str) {
        lock(&self.statuses).remove(id);
    }

    pub fn set_accepted(&self, id: &str, records: Vec<HistoryRequest>) {
        lock(&self.accepted).insert(id.to_string(), records);
    }

    pub fn set_transfer(&self, id: &str, resp: TransferResponse) {
        lock(&self.transfers).insert(id.to_string(), resp);
    }

    pub fn set_submit(&self, reply: Result<SubmitResponse, (u16, String)>) {
        *lock(&self.submit) = Some(reply);
    }

    pub fn set_eligibility(&self, id: &str, resp: EligibilityResponse) {
        lock(&self.eligibility).insert(id.to_string(), resp);
    }

    /// Hold calls named `key` (for example `status/21CS001`) until released.
    pub fn gate(&self, key: &str) -> Arc<Notify> {
        lock(&self.gates)
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Notify::new()))
            .clone()
    }

    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub fn count(&self, key: &str) -> usize {
        lock(&self.calls).iter().filter(|c| *c == key).count()
    }

    async fn enter(&self, key: String) {
        lock(&self.calls).push(key.clone());
        let gate = lock(&self.gates).get(&key).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap()
}

fn unscripted() -> ApiError {
    ApiError::Server {
        status: 500,
        message: "unscripted".into(),
    }
}

#[async_trait::async_trait]
impl ReissueApi for FakeApi {
    async fn status(&self, register_number: &str) -> Result<StatusResponse, ApiError> {
        self.enter(format!("status/{register_number}")).await;
        lock(&self.statuses)
            .get(register_number)
            .cloned()
            .ok_or_else(unscripted)
    }

    async fn accepted_requests(
        &self,
        register_number: &str,
    ) -> Result<Vec<HistoryRequest>, ApiError> {
        self.enter(format!("accepted/{register_number}")).await;
        lock(&self.accepted)
            .get(register_number)
            .cloned()
            .ok_or_else(unscripted)
    }

    async fn transfer_to_history(
        &self,
        register_number: &str,
    ) -> Result<TransferResponse, ApiError> {
        self.enter(format!("transfer/{register_number}")).await;
        lock(&self.transfers)
            .get(register_number)
            .cloned()
            .ok_or_else(unscripted)
    }

    async fn submit_request(&self, form: &ReissueForm) -> Result<SubmitResponse, ApiError> {
        self.enter(format!("submit/{}", form.register_number)).await;
        match lock(&self.submit).clone() {
            Some(Ok(resp)) => Ok(resp),
            Some(Err((status, message))) => Err(ApiError::Server { status, message }),
            None => Err(unscripted()),
        }
    }

    async fn check_eligibility(
        &self,
        register_number: &str,
    ) -> Result<EligibilityResponse, ApiError> {
        self.enter(format!("eligibility/{register_number}")).await;
        lock(&self.eligibility)
            .get(register_number)
            .cloned()
            .ok_or_else(unscripted)
    }

    async fn health(&self) -> Result<(), ApiError> {
        self.enter("health".to_string()).await;
        Ok(())
    }
}
