//! Periodic automatic escalation of overdue issues.
//!
//! Every tick, issues still in `created` past their category's escalation
//! threshold are escalated through the same rules as a citizen-requested
//! category escalation.

use std::time::Duration;

use chrono::Utc;
use civic_workflow::IssueWorkflow;
use tokio_util::sync::CancellationToken;

/// Run the escalation sweep loop until `cancel` is triggered.
///
/// A failed pass is logged and retried on the next tick.
pub async fn run(workflow: IssueWorkflow, every: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = every.as_secs(), "Auto-escalation job started");

    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Auto-escalation job stopping");
                break;
            }
            _ = interval.tick() => {
                match workflow.run_escalation_sweep(Utc::now()).await {
                    Ok(report) if report.escalated > 0 || report.skipped > 0 => {
                        tracing::info!(
                            escalated = report.escalated,
                            skipped = report.skipped,
                            "Auto-escalation pass finished"
                        );
                    }
                    Ok(_) => tracing::debug!("Auto-escalation: nothing overdue"),
                    Err(e) => tracing::error!(error = %e, "Auto-escalation pass failed"),
                }
            }
        }
    }
}
