//! The dashboard shell: one Flux instance with every handler registered,
//! plus typed entry points for hosts that do not want to emit by path.

use std::sync::Arc;

use reissue_client::{HistoryRequest, ReissueApi, ReissueForm};
use reissue_flux::{Flux, StateValue, SubscriptionId};

use crate::config::DashboardConfig;
use crate::handlers::{register_handlers, DashboardContext};
use crate::request::*;
use crate::view::DashboardView;

pub struct Dashboard {
    flux: Flux,
    ctx: Arc<DashboardContext>,
}

impl Dashboard {
    pub fn new(api: Arc<dyn ReissueApi>, config: DashboardConfig) -> Self {
        let flux = Flux::new();
        let ctx = Arc::new(DashboardContext::new(api, config));
        register_handlers(&flux, Arc::clone(&ctx));
        Self { flux, ctx }
    }

    /// Show a student (or nobody). `history` is the archived list the host
    /// already holds.
    pub async fn open(&self, register_number: Option<&str>, history: Arc<Vec<HistoryRequest>>) {
        self.flux
            .emit(
                OpenSessionReq::PATH,
                OpenSessionReq {
                    register_number: register_number.map(str::to_string),
                    history,
                },
            )
            .await;
    }

    pub async fn close(&self) {
        self.flux.emit(CloseSessionReq::PATH, CloseSessionReq).await;
    }

    pub async fn refresh_status(&self) {
        self.flux.emit(RefreshStatusReq::PATH, RefreshStatusReq).await;
    }

    pub async fn load_history(&self) {
        self.flux.emit(LoadHistoryReq::PATH, LoadHistoryReq).await;
    }

    pub async fn supply_history(&self, history: Arc<Vec<HistoryRequest>>) {
        self.flux
            .emit(SupplyHistoryReq::PATH, SupplyHistoryReq { history })
            .await;
    }

    pub async fn submit(&self, form: ReissueForm) {
        self.flux.emit(SubmitFormReq::PATH, SubmitFormReq { form }).await;
    }

    pub async fn check_eligibility(&self, register_number: &str) {
        self.flux
            .emit(
                CheckEligibilityReq::PATH,
                CheckEligibilityReq {
                    register_number: register_number.to_string(),
                },
            )
            .await;
    }

    pub async fn acknowledge_pickup(&self) {
        self.flux
            .emit(AcknowledgePickupReq::PATH, AcknowledgePickupReq)
            .await;
    }

    pub fn view(&self) -> DashboardView {
        DashboardView::from_store(self.flux.store())
    }

    pub fn flux(&self) -> &Flux {
        &self.flux
    }

    /// Observe state changes. Use `#` for everything.
    pub fn subscribe<F>(&self, pattern: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&str, &StateValue) + Send + Sync + 'static,
    {
        self.flux.subscribe(pattern, handler)
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.ctx.session.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use reissue_client::{
        EligibilityResponse, RequestStatus, StatusDetails, StatusResponse, SubmitResponse,
        TransferResponse,
    };

    use super::*;
    use crate::handlers::fake::FakeApi;
    use crate::state::history::LOAD_ERROR;
    use crate::state::pickup::{TRANSFER_ERROR, TRANSFER_FAILED};
    use crate::state::form::FORM_CLOSED;
    use crate::state::{Notice, ProgressState, TransferState};

    fn status(status: RequestStatus, printing: bool, ready: bool) -> StatusResponse {
        let idle = status == RequestStatus::None;
        StatusResponse {
            success: true,
            status,
            form_enabled: idle,
            button_text: if idle {
                "Submit Request".into()
            } else {
                "Request in progress".into()
            },
            details: StatusDetails {
                has_id_card_request: !idle,
                is_printing: printing,
                is_ready_for_pickup: ready,
            },
        }
    }

    fn record(id: &str) -> HistoryRequest {
        HistoryRequest {
            id: id.into(),
            register_number: "21CS001".into(),
            name: "Asha".into(),
            reason: "Lost".into(),
            created_at: "2024-01-05T10:00:00Z".into(),
        }
    }

    fn form(id: &str) -> ReissueForm {
        ReissueForm {
            register_number: id.into(),
            name: "Asha".into(),
            department: "Computer Science Engineering".into(),
            year: "3".into(),
            section: "A".into(),
            reason: "Lost".into(),
            dob: "2000-01-01".into(),
            library_code: "LIB001".into(),
        }
    }

    /// A student with nothing in progress and a submission that succeeds.
    fn idle_student(id: &str) -> Arc<FakeApi> {
        let api = FakeApi::new();
        api.set_status(id, status(RequestStatus::None, false, false));
        api.set_accepted(id, Vec::new());
        api.set_submit(Ok(SubmitResponse {
            success: true,
            message: "Request submitted".into(),
        }));
        api
    }

    fn dashboard(api: &Arc<FakeApi>) -> Dashboard {
        Dashboard::new(api.clone(), DashboardConfig::default())
    }

    fn step(store: &reissue_flux::StateStore) -> u8 {
        store
            .get_as::<ProgressState>(ProgressState::PATH)
            .unwrap_or_default()
            .step
            .index()
    }

    // ========================================================================
    // Status
    // ========================================================================

    #[tokio::test]
    async fn open_applies_server_status() {
        let api = FakeApi::new();
        api.set_status("21CS001", status(RequestStatus::ApprovedPrinting, true, false));
        api.set_accepted("21CS001", Vec::new());
        let dash = dashboard(&api);

        dash.open(Some("21CS001"), Arc::default()).await;

        let view = dash.view();
        assert_eq!(view.current_step, 3);
        assert!(view.printing_active);
        assert!(view.form_disabled);
        assert_eq!(view.button_text, "Request in progress");
    }

    #[tokio::test]
    async fn failed_status_fetch_yields_safe_default() {
        let api = FakeApi::new();
        api.set_accepted("21CS001", Vec::new());
        let dash = dashboard(&api);

        dash.open(Some("21CS001"), Arc::default()).await;

        let view = dash.view();
        assert_eq!(view.current_step, 0);
        assert!(!view.form_disabled);
        assert_eq!(view.button_text, "Submit Request");
        assert!(!view.printing_active);
        assert!(!view.pickup.visible);
    }

    #[tokio::test]
    async fn stale_status_reply_never_overwrites_newer_identity() {
        let api = FakeApi::new();
        api.set_status("A", status(RequestStatus::ReadyPickup, false, true));
        api.set_status("B", status(RequestStatus::None, false, false));
        api.set_accepted("B", Vec::new());
        let gate = api.gate("status/A");
        let dash = Arc::new(dashboard(&api));

        let first = {
            let dash = dash.clone();
            tokio::spawn(async move { dash.open(Some("A"), Arc::default()).await })
        };
        while api.count("status/A") == 0 {
            tokio::task::yield_now().await;
        }

        dash.open(Some("B"), Arc::default()).await;
        gate.notify_one();
        first.await.unwrap();

        let view = dash.view();
        assert_eq!(view.register_number.as_deref(), Some("B"));
        assert!(!view.pickup.visible);
        assert!(!view.form_disabled);
        assert_eq!(api.count("accepted/A"), 0);
    }

    // ========================================================================
    // Optimistic submission
    // ========================================================================

    #[tokio::test(start_paused = true)]
    async fn submission_reaches_under_review_after_delay() {
        let api = idle_student("21CS001");
        let dash = dashboard(&api);
        dash.open(Some("21CS001"), Arc::default()).await;

        dash.submit(form("21CS001")).await;
        assert_eq!(dash.view().current_step, 1);
        assert_eq!(
            dash.view().submission.notice,
            Some(Notice::success("Request submitted"))
        );

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert_eq!(dash.view().current_step, 1);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(dash.view().current_step, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn printing_before_delay_keeps_server_step() {
        let api = idle_student("21CS001");
        let dash = dashboard(&api);
        dash.open(Some("21CS001"), Arc::default()).await;
        dash.submit(form("21CS001")).await;

        api.set_status("21CS001", status(RequestStatus::ApprovedPrinting, true, false));
        dash.refresh_status().await;
        assert_eq!(dash.view().current_step, 3);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(dash.view().current_step, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn delay_never_fires_after_close() {
        let api = idle_student("21CS001");
        let dash = dashboard(&api);
        dash.open(Some("21CS001"), Arc::default()).await;
        dash.submit(form("21CS001")).await;

        dash.close().await;
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(step(dash.flux().store()), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn delay_never_fires_after_identity_change() {
        let api = idle_student("21CS001");
        api.set_status("21CS002", status(RequestStatus::None, false, false));
        api.set_accepted("21CS002", Vec::new());
        let dash = dashboard(&api);
        dash.open(Some("21CS001"), Arc::default()).await;
        dash.submit(form("21CS001")).await;

        // The second student submits halfway through the first delay, so the
        // store sits at Submitted when the first delay would have ended.
        tokio::time::sleep(Duration::from_millis(1000)).await;
        dash.open(Some("21CS002"), Arc::default()).await;
        dash.submit(form("21CS002")).await;
        assert_eq!(dash.view().current_step, 1);

        tokio::time::sleep(Duration::from_millis(1001)).await;
        assert_eq!(dash.view().current_step, 1);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(dash.view().current_step, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn delay_never_fires_after_drop() {
        let api = idle_student("21CS001");
        let dash = dashboard(&api);
        dash.open(Some("21CS001"), Arc::default()).await;
        dash.submit(form("21CS001")).await;

        let store = dash.flux().store().clone();
        drop(dash);
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(step(&store), 1);
    }

    #[tokio::test]
    async fn submission_blocked_while_form_closed() {
        let api = FakeApi::new();
        api.set_status("21CS001", status(RequestStatus::UnderReview, false, false));
        api.set_accepted("21CS001", Vec::new());
        let dash = dashboard(&api);
        dash.open(Some("21CS001"), Arc::default()).await;

        dash.submit(form("21CS001")).await;

        assert_eq!(api.count("submit/21CS001"), 0);
        assert_eq!(dash.view().current_step, 2);
        assert_eq!(
            dash.view().submission.notice,
            Some(Notice::failure(FORM_CLOSED))
        );
    }

    #[tokio::test]
    async fn second_submit_while_in_flight_is_ignored() {
        let api = idle_student("21CS001");
        let gate = api.gate("submit/21CS001");
        let dash = Arc::new(dashboard(&api));
        dash.open(Some("21CS001"), Arc::default()).await;

        let first = {
            let dash = dash.clone();
            tokio::spawn(async move { dash.submit(form("21CS001")).await })
        };
        while api.count("submit/21CS001") == 0 {
            tokio::task::yield_now().await;
        }
        let view = dash.view();
        assert!(view.submission.busy);
        assert!(view.form_disabled);

        dash.submit(form("21CS001")).await;
        assert_eq!(api.count("submit/21CS001"), 1);

        gate.notify_one();
        first.await.unwrap();

        let view = dash.view();
        assert!(!view.submission.busy);
        assert_eq!(
            view.submission.notice,
            Some(Notice::success("Request submitted"))
        );
        assert_eq!(view.current_step, 1);
    }

    #[tokio::test]
    async fn close_clears_in_flight_submission() {
        let api = idle_student("21CS001");
        let gate = api.gate("submit/21CS001");
        let dash = Arc::new(dashboard(&api));
        dash.open(Some("21CS001"), Arc::default()).await;

        let pending = {
            let dash = dash.clone();
            tokio::spawn(async move { dash.submit(form("21CS001")).await })
        };
        while api.count("submit/21CS001") == 0 {
            tokio::task::yield_now().await;
        }

        dash.close().await;
        gate.notify_one();
        pending.await.unwrap();

        let view = dash.view();
        assert!(!view.submission.busy);
        assert_eq!(view.submission.notice, None);
    }

    #[tokio::test]
    async fn rejected_submission_surfaces_server_message() {
        let api = idle_student("NOT_ELIGIBLE001");
        api.set_submit(Err((403, "Student is not eligible for reissue".into())));
        let dash = dashboard(&api);
        dash.open(Some("NOT_ELIGIBLE001"), Arc::default()).await;

        dash.submit(form("NOT_ELIGIBLE001")).await;

        let view = dash.view();
        assert_eq!(view.current_step, 0);
        assert!(!view.submission.busy);
        assert_eq!(
            view.submission.notice,
            Some(Notice::failure("Student is not eligible for reissue"))
        );
    }

    #[tokio::test]
    async fn eligibility_result_is_stored() {
        let api = FakeApi::new();
        api.set_eligibility(
            "ELIGIBLE001",
            EligibilityResponse {
                eligible: true,
                message: "Student is eligible".into(),
            },
        );
        let dash = dashboard(&api);

        dash.check_eligibility("ELIGIBLE001").await;

        let view = dash.view();
        assert!(!view.eligibility.checking);
        assert_eq!(view.eligibility.eligible, Some(true));
        assert_eq!(view.eligibility.message.as_deref(), Some("Student is eligible"));
    }

    // ========================================================================
    // Pickup
    // ========================================================================

    fn record_transfers(dash: &Dashboard) -> Arc<Mutex<Vec<bool>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        dash.subscribe(TransferState::PATH, move |_, value| {
            if let Some(t) = value.downcast_ref::<TransferState>() {
                sink.lock().unwrap().push(t.busy);
            }
        });
        seen
    }

    #[tokio::test]
    async fn acknowledged_pickup_reopens_form() {
        let api = FakeApi::new();
        api.set_status("ELIGIBLE001", status(RequestStatus::ReadyPickup, false, true));
        api.set_accepted("ELIGIBLE001", vec![record("acc-1")]);
        let dash = dashboard(&api);
        dash.open(Some("ELIGIBLE001"), Arc::default()).await;

        let view = dash.view();
        assert!(view.pickup.visible);
        assert!(view.form_disabled);
        assert_eq!(view.current_step, 4);

        api.set_transfer(
            "ELIGIBLE001",
            TransferResponse {
                success: true,
                message: "ID card transferred to history".into(),
                transferred_count: 1,
            },
        );
        api.set_status("ELIGIBLE001", status(RequestStatus::None, false, false));
        let seen = record_transfers(&dash);

        dash.acknowledge_pickup().await;

        let view = dash.view();
        assert_eq!(*seen.lock().unwrap(), vec![true, false]);
        assert!(!view.pickup.visible);
        assert!(!view.form_disabled);
        assert_eq!(
            view.pickup.notice,
            Some(Notice::success("ID card transferred to history"))
        );
        assert_eq!(api.count("status/ELIGIBLE001"), 2);
    }

    #[tokio::test]
    async fn follow_up_status_only_refreshes_pickup_flag() {
        let api = FakeApi::new();
        api.set_status("ELIGIBLE001", status(RequestStatus::ReadyPickup, false, true));
        api.set_accepted("ELIGIBLE001", Vec::new());
        api.set_transfer(
            "ELIGIBLE001",
            TransferResponse {
                success: true,
                message: "ID card transferred to history".into(),
                transferred_count: 1,
            },
        );
        let dash = dashboard(&api);
        dash.open(Some("ELIGIBLE001"), Arc::default()).await;

        // Follow-up reply carries only the pickup flag: formEnabled is false.
        api.set_status(
            "ELIGIBLE001",
            StatusResponse {
                success: true,
                ..Default::default()
            },
        );
        dash.acknowledge_pickup().await;

        let view = dash.view();
        assert!(!view.pickup.visible);
        assert!(!view.form_disabled);
        assert_eq!(view.current_step, 0);
    }

    #[tokio::test]
    async fn close_clears_in_flight_transfer() {
        let api = FakeApi::new();
        api.set_status("ELIGIBLE001", status(RequestStatus::ReadyPickup, false, true));
        api.set_accepted("ELIGIBLE001", Vec::new());
        api.set_transfer(
            "ELIGIBLE001",
            TransferResponse {
                success: true,
                message: "ID card transferred to history".into(),
                transferred_count: 1,
            },
        );
        let gate = api.gate("transfer/ELIGIBLE001");
        let dash = Arc::new(dashboard(&api));
        dash.open(Some("ELIGIBLE001"), Arc::default()).await;

        let pending = {
            let dash = dash.clone();
            tokio::spawn(async move { dash.acknowledge_pickup().await })
        };
        while api.count("transfer/ELIGIBLE001") == 0 {
            tokio::task::yield_now().await;
        }
        assert!(dash.view().pickup.transferring);

        dash.close().await;
        gate.notify_one();
        pending.await.unwrap();

        let view = dash.view();
        assert!(!view.pickup.transferring);
        assert_eq!(view.pickup.notice, None);
        assert_eq!(api.count("status/ELIGIBLE001"), 1);
    }

    #[tokio::test]
    async fn refused_transfer_leaves_form_unchanged() {
        let api = FakeApi::new();
        api.set_status("ELIGIBLE001", status(RequestStatus::ReadyPickup, false, true));
        api.set_accepted("ELIGIBLE001", Vec::new());
        api.set_transfer("ELIGIBLE001", TransferResponse::default());
        let dash = dashboard(&api);
        dash.open(Some("ELIGIBLE001"), Arc::default()).await;
        let seen = record_transfers(&dash);

        dash.acknowledge_pickup().await;

        let view = dash.view();
        assert_eq!(*seen.lock().unwrap(), vec![true, false]);
        assert!(view.form_disabled);
        assert!(view.pickup.visible);
        assert_eq!(view.pickup.notice, Some(Notice::failure(TRANSFER_FAILED)));
        assert_eq!(api.count("status/ELIGIBLE001"), 1);
    }

    #[tokio::test]
    async fn transfer_error_shows_generic_message() {
        let api = FakeApi::new();
        api.set_status("ELIGIBLE001", status(RequestStatus::ReadyPickup, false, true));
        api.set_accepted("ELIGIBLE001", Vec::new());
        let dash = dashboard(&api);
        dash.open(Some("ELIGIBLE001"), Arc::default()).await;
        let seen = record_transfers(&dash);

        dash.acknowledge_pickup().await;

        assert_eq!(*seen.lock().unwrap(), vec![true, false]);
        assert_eq!(
            dash.view().pickup.notice,
            Some(Notice::failure(TRANSFER_ERROR))
        );
    }

    #[tokio::test]
    async fn acknowledge_without_pickup_is_noop() {
        let api = idle_student("21CS001");
        let dash = dashboard(&api);
        dash.open(Some("21CS001"), Arc::default()).await;

        dash.acknowledge_pickup().await;

        assert_eq!(api.count("transfer/21CS001"), 0);
        assert_eq!(dash.view().pickup.notice, None);
    }

    // ========================================================================
    // History
    // ========================================================================

    #[tokio::test]
    async fn history_lists_accepted_then_supplied_without_dedup() {
        let api = idle_student("21CS001");
        api.set_accepted("21CS001", vec![record("a")]);
        let dash = dashboard(&api);

        dash.open(Some("21CS001"), Arc::new(vec![record("h1"), record("a")]))
            .await;

        let view = dash.view();
        let ids: Vec<&str> = view.history.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "h1", "a"]);
        assert!(!view.history.loading);
        assert_eq!(view.history.error, None);
    }

    #[tokio::test]
    async fn history_error_discards_both_sources() {
        let api = FakeApi::new();
        api.set_status("21CS001", status(RequestStatus::None, false, false));
        let dash = dashboard(&api);

        dash.open(Some("21CS001"), Arc::new(vec![record("h1")])).await;

        let view = dash.view();
        assert!(view.history.entries.is_empty());
        assert_eq!(view.history.error.as_deref(), Some(LOAD_ERROR));
    }

    #[tokio::test]
    async fn supplying_new_history_reloads_once() {
        let api = idle_student("21CS001");
        let dash = dashboard(&api);
        let supplied = Arc::new(vec![record("h1")]);
        dash.open(Some("21CS001"), supplied.clone()).await;
        assert_eq!(api.count("accepted/21CS001"), 1);

        dash.supply_history(supplied).await;
        assert_eq!(api.count("accepted/21CS001"), 1);

        dash.supply_history(Arc::new(vec![record("h1"), record("h2")]))
            .await;
        assert_eq!(api.count("accepted/21CS001"), 2);
        assert_eq!(dash.view().history.entries.len(), 2);
    }

    #[tokio::test]
    async fn no_student_means_empty_idle_history() {
        let api = FakeApi::new();
        let dash = dashboard(&api);

        dash.open(None, Arc::new(vec![record("h1")])).await;

        let view = dash.view();
        assert!(view.history.entries.is_empty());
        assert!(!view.history.loading);
        assert!(api.calls().is_empty());
    }
}
