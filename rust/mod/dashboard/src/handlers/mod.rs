//! Request handlers and Flux wiring.
//!
//! Each handler takes the typed request, the state store and the shared
//! [`DashboardContext`]; `register_handlers` does the payload downcast.

pub mod form;
pub mod history;
pub mod pickup;
pub mod session;
pub mod status;

#[cfg(test)]
pub(crate) mod fake;

use std::sync::Arc;

use reissue_client::ReissueApi;
use reissue_flux::{Flux, StateStore};
use tracing::warn;

use crate::config::DashboardConfig;
use crate::request::*;
use crate::session::SessionControl;

/// What every handler can reach besides the store.
pub struct DashboardContext {
    pub api: Arc<dyn ReissueApi>,
    pub session: SessionControl,
    pub config: DashboardConfig,
}

impl DashboardContext {
    pub fn new(api: Arc<dyn ReissueApi>, config: DashboardConfig) -> Self {
        Self {
            api,
            session: SessionControl::new(),
            config,
        }
    }
}

/// Register all dashboard handlers with a Flux instance.
pub fn register_handlers(flux: &Flux, ctx: Arc<DashboardContext>) {
    // session/open
    {
        let ctx = ctx.clone();
        flux.on(OpenSessionReq::PATH, move |path, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                let Some(req) = payload.downcast_ref::<OpenSessionReq>() else {
                    warn!("{}: unexpected payload", path);
                    return;
                };
                session::handle_open(req, &store, &ctx).await;
            }
        });
    }

    // session/close
    {
        let ctx = ctx.clone();
        flux.on(CloseSessionReq::PATH, move |_, _, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                session::handle_close(&store, &ctx);
            }
        });
    }

    // status/refresh
    {
        let ctx = ctx.clone();
        flux.on(RefreshStatusReq::PATH, move |_, _, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                status::refresh(&store, &ctx).await;
            }
        });
    }

    // history/load
    {
        let ctx = ctx.clone();
        flux.on(LoadHistoryReq::PATH, move |_, _, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                history::load(&store, &ctx).await;
            }
        });
    }

    // history/supply
    {
        let ctx = ctx.clone();
        flux.on(SupplyHistoryReq::PATH, move |path, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                let Some(req) = payload.downcast_ref::<SupplyHistoryReq>() else {
                    warn!("{}: unexpected payload", path);
                    return;
                };
                history::handle_supply(req, &store, &ctx).await;
            }
        });
    }

    // form/submit
    {
        let ctx = ctx.clone();
        flux.on(SubmitFormReq::PATH, move |path, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                let Some(req) = payload.downcast_ref::<SubmitFormReq>() else {
                    warn!("{}: unexpected payload", path);
                    return;
                };
                form::handle_submit(req, &store, &ctx).await;
            }
        });
    }

    // form/check-eligibility
    {
        let ctx = ctx.clone();
        flux.on(CheckEligibilityReq::PATH, move |path, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                let Some(req) = payload.downcast_ref::<CheckEligibilityReq>() else {
                    warn!("{}: unexpected payload", path);
                    return;
                };
                form::handle_check_eligibility(req, &store, &ctx).await;
            }
        });
    }

    // pickup/acknowledge
    flux.on(AcknowledgePickupReq::PATH, move |_, _, store: Arc<StateStore>| {
        let ctx = ctx.clone();
        async move {
            pickup::handle_acknowledge(&store, &ctx).await;
        }
    });
}
