//! Table and JSON output for dashboard snapshots.

use anyhow::Result;
use reissue_dashboard::state::Notice;
use reissue_dashboard::view::{HistoryView, StepStatus};
use reissue_dashboard::DashboardView;
use serde::Serialize;

pub fn json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn view(view: &DashboardView, as_json: bool) -> Result<()> {
    if as_json {
        return json(view);
    }

    if let Some(id) = &view.register_number {
        println!("Student: {}", id);
    }
    for step in &view.steps {
        let marker = match step.status {
            StepStatus::Done => "[x]",
            StepStatus::Current => "[>]",
            StepStatus::Pending => "[ ]",
        };
        println!("  {} {}. {}", marker, step.index, step.label);
    }
    if view.printing_active {
        println!("Card is being printed.");
    }
    if view.pickup.visible {
        println!("Your ID card is ready for pickup. Run `reissue ack` once collected.");
    }
    if let Some(notice) = &view.pickup.notice {
        self::notice(notice);
    }

    let gate = if view.form_disabled { "closed" } else { "open" };
    println!("Form: {} ({})", gate, view.button_text);
    Ok(())
}

pub fn history(history: &HistoryView, as_json: bool) -> Result<()> {
    if as_json {
        return json(history);
    }
    if let Some(error) = &history.error {
        println!("{}", error);
        return Ok(());
    }
    if history.entries.is_empty() {
        println!("No previous requests.");
        return Ok(());
    }

    println!("{:26} {:20} {:14} {:12} {}", "ID", "NAME", "REGISTER", "ACCEPTED ON", "REASON");
    for e in &history.entries {
        println!(
            "{:26} {:20} {:14} {:12} {}",
            e.id,
            e.name,
            e.register_number,
            e.accepted_on,
            e.reason.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

pub fn notice(notice: &Notice) {
    if notice.success {
        println!("OK: {}", notice.text);
    } else {
        eprintln!("Error: {}", notice.text);
    }
}
