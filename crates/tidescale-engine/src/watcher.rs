//! Watcher — the polling task bound to a single rule.
//!
//! Runs `check`, sleeps for the rule's interval, and repeats. The first
//! check error is pushed to the supervisor's sink and the watcher stops
//! for good; there is no restart and no backoff. A shutdown signal ends
//! the watcher during a sleep or an in-flight check. A dropped shutdown
//! sender means shutdown can no longer be requested, so the watcher keeps
//! running until its rule fails.

use tidescale_core::{CheckError, Rule};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error};

/// A terminal rule failure, as reported to the supervisor.
#[derive(Debug)]
pub struct RuleFailure {
    pub rule: String,
    pub error: CheckError,
}

/// How a watcher ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    /// The rule's check failed and the failure was reported.
    Failed,
    /// The shutdown signal was received.
    Cancelled,
}

/// Drive `rule` until its check fails or `shutdown` flips.
///
/// The sink must have room for this watcher's single report; the
/// supervisor sizes it to the rule count.
pub async fn watch_rule(
    name: String,
    mut rule: Box<dyn Rule>,
    sink: mpsc::Sender<RuleFailure>,
    mut shutdown: watch::Receiver<bool>,
) -> WatchOutcome {
    let interval = rule.check_interval();
    debug!(rule = %name, ?interval, "watcher started");

    loop {
        if *shutdown.borrow_and_update() {
            return cancelled(&name);
        }

        let result = tokio::select! {
            result = rule.check() => result,
            _ = shutdown_requested(&mut shutdown) => return cancelled(&name),
        };

        if let Err(e) = result {
            error!(rule = %name, error = %e, "rule check failed, watcher stopping");
            match sink.try_send(RuleFailure { rule: name.clone(), error: e }) {
                Ok(()) => {}
                Err(TrySendError::Full(failure)) => {
                    error!(rule = %name, error = %failure.error, "failure sink full, report dropped");
                }
                // Only happens once the supervisor has stopped listening.
                Err(TrySendError::Closed(_)) => {
                    debug!(rule = %name, "failure sink closed, report dropped");
                }
            }
            return WatchOutcome::Failed;
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = shutdown_requested(&mut shutdown) => return cancelled(&name),
        }
    }
}

/// Resolves once `true` is published. Never resolves if the sender is gone.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}

fn cancelled(name: &str) -> WatchOutcome {
    debug!(rule = %name, "watcher shutting down");
    WatchOutcome::Cancelled
}
