//! Supervisor — starts one watcher per rule and collects their outcomes.
//!
//! All watchers share a bounded failure sink sized to the rule count, so
//! a watcher's single report never waits for room. What happens after a
//! report arrives is decided by the [`FailurePolicy`]:
//!
//! - `FailFast`: the first failure stops every watcher. Reports that
//!   arrive after it are never read.
//! - `Isolate`: failures are logged and the remaining watchers keep running
//!   until they all end or shutdown is requested.
//!
//! A watcher task that panics never reports through the sink. The
//! supervisor also waits on the watcher tasks themselves and treats a
//! panic like a failure under either policy.
//!
//! The supervisor returns a [`SupervisorReport`]; turning that into a
//! process exit status is left to the caller.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tidescale_core::RuleSet;
use tokio::sync::{mpsc, watch};
use tokio::task::{self, JoinError, JoinSet};
use tracing::{error, info, warn};

use crate::watcher::{RuleFailure, WatchOutcome, watch_rule};

/// What the supervisor does when a rule fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop every rule on the first failure.
    #[default]
    FailFast,
    /// Keep the other rules running.
    Isolate,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fail-fast" => Ok(Self::FailFast),
            "isolate" => Ok(Self::Isolate),
            _ => Err(format!("unknown failure policy: {s} (expected fail-fast or isolate)")),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FailFast => write!(f, "fail-fast"),
            Self::Isolate => write!(f, "isolate"),
        }
    }
}

/// Final state of one rule's watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    Failed,
    Cancelled,
    /// The watcher task panicked.
    Aborted(String),
}

/// Result of a supervisor run.
#[derive(Debug, Default)]
pub struct SupervisorReport {
    outcomes: BTreeMap<String, RuleOutcome>,
    failures: Vec<RuleFailure>,
}

impl SupervisorReport {
    /// Per-rule watcher outcomes.
    pub fn outcomes(&self) -> &BTreeMap<String, RuleOutcome> {
        &self.outcomes
    }

    /// Failures read from the sink, in arrival order.
    pub fn failures(&self) -> &[RuleFailure] {
        &self.failures
    }

    /// The chronologically first failure, if any rule failed.
    pub fn first_failure(&self) -> Option<&RuleFailure> {
        self.failures.first()
    }

    /// Rules whose watcher task panicked, with the panic description.
    pub fn aborted(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|(rule, outcome)| match outcome {
            RuleOutcome::Aborted(reason) => Some((rule.as_str(), reason.as_str())),
            _ => None,
        })
    }

    /// True when no rule failed and no watcher panicked.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.aborted().next().is_none()
    }
}

/// Owns the rule set and runs it.
pub struct Supervisor {
    rules: RuleSet,
    policy: FailurePolicy,
}

impl Supervisor {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Run until the policy says stop, or until every watcher has ended.
    pub async fn run(self) -> SupervisorReport {
        self.run_until(std::future::pending()).await
    }

    /// Like [`run`](Self::run), but also stops when `shutdown` resolves.
    pub async fn run_until<F>(self, shutdown: F) -> SupervisorReport
    where
        F: Future<Output = ()>,
    {
        let mut report = SupervisorReport::default();
        if self.rules.is_empty() {
            warn!("no rules configured, nothing to watch");
            return report;
        }

        let (sink_tx, mut sink_rx) = mpsc::channel(self.rules.len());
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let mut watchers = JoinSet::new();
        let mut names: HashMap<task::Id, String> = HashMap::with_capacity(self.rules.len());
        for (name, rule) in self.rules {
            let handle = watchers.spawn(watch_rule(
                name.clone(),
                rule,
                sink_tx.clone(),
                cancel_rx.clone(),
            ));
            names.insert(handle.id(), name);
        }
        drop(sink_tx);

        info!(rules = names.len(), policy = %self.policy, "supervisor started");

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                // A watcher reports before its task ends, so the sink goes first.
                biased;

                Some(failure) = sink_rx.recv() => {
                    error!(rule = %failure.rule, error = %failure.error, "rule failed");
                    report.failures.push(failure);
                    if self.policy == FailurePolicy::FailFast {
                        break;
                    }
                }
                joined = watchers.join_next_with_id() => {
                    let Some(joined) = joined else {
                        info!("all watchers ended");
                        break;
                    };
                    let (name, outcome) = settle(&mut names, joined);
                    let aborted = matches!(outcome, RuleOutcome::Aborted(_));
                    report.outcomes.insert(name, outcome);
                    if aborted && self.policy == FailurePolicy::FailFast {
                        break;
                    }
                }
                _ = &mut shutdown => {
                    info!("shutdown requested");
                    break;
                }
            }
        }

        // Stop listening before cancelling: reports sent from here on are dropped.
        drop(sink_rx);
        let _ = cancel_tx.send(true);

        while let Some(joined) = watchers.join_next_with_id().await {
            let (name, outcome) = settle(&mut names, joined);
            report.outcomes.insert(name, outcome);
        }

        info!(failures = report.failures.len(), "supervisor stopped");
        report
    }
}

/// Map a finished watcher task to its rule name and outcome.
fn settle(
    names: &mut HashMap<task::Id, String>,
    joined: Result<(task::Id, WatchOutcome), JoinError>,
) -> (String, RuleOutcome) {
    let (id, outcome) = match joined {
        Ok((id, WatchOutcome::Failed)) => (id, RuleOutcome::Failed),
        Ok((id, WatchOutcome::Cancelled)) => (id, RuleOutcome::Cancelled),
        Err(e) => (e.id(), RuleOutcome::Aborted(e.to_string())),
    };
    let name = names.remove(&id).unwrap_or_else(|| id.to_string());
    if let RuleOutcome::Aborted(reason) = &outcome {
        error!(rule = %name, error = %reason, "watcher task aborted");
    }
    (name, outcome)
}
