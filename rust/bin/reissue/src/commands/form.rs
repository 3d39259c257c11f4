//! Submission and eligibility commands.

use std::sync::Arc;

use anyhow::Result;
use reissue_client::ReissueForm;
use reissue_dashboard::{Dashboard, DashboardConfig};

use crate::render;

/// Submit a reissue request through the dashboard, so the form gate applies.
pub async fn submit(server: &str, form: ReissueForm, as_json: bool) -> Result<()> {
    let register_number = form.register_number.clone();
    let dashboard = super::dashboard::open(server, &register_number, Arc::default()).await?;
    if dashboard.view().form_disabled {
        let view = dashboard.view();
        anyhow::bail!(
            "The form is closed for {} ({}).",
            register_number,
            view.button_text
        );
    }

    dashboard.submit(form).await;

    let view = dashboard.view();
    if as_json {
        render::json(&view.submission)?;
    } else {
        if let Some(notice) = &view.submission.notice {
            render::notice(notice);
        }
        render::view(&view, false)?;
    }

    match &view.submission.notice {
        Some(n) if n.success => Ok(()),
        _ => anyhow::bail!("submission failed"),
    }
}

pub async fn eligibility(server: &str, register_number: &str, as_json: bool) -> Result<()> {
    let api = super::client(server)?;
    let dashboard = Dashboard::new(api, DashboardConfig::default());
    dashboard.check_eligibility(register_number).await;

    let result = dashboard.view().eligibility;
    if as_json {
        return render::json(&result);
    }

    let verdict = match result.eligible {
        Some(true) => "eligible",
        Some(false) => "not eligible",
        None => "unknown",
    };
    println!("{}: {}", register_number, verdict);
    if let Some(message) = &result.message {
        println!("  {}", message);
    }
    Ok(())
}
