//! Rule doubles for watcher and supervisor tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tidescale_core::{CheckError, ProbeError, Rule};

/// A rule that counts checks and fails on a chosen call.
pub(crate) struct ScriptedRule {
    pub name: &'static str,
    pub calls: Arc<AtomicUsize>,
    pub fail_on: Option<usize>,
    /// Time each check takes before returning.
    pub latency: Duration,
    pub interval: Duration,
}

impl ScriptedRule {
    pub fn healthy(name: &'static str) -> Self {
        Self {
            name,
            calls: Arc::new(AtomicUsize::new(0)),
            fail_on: None,
            latency: Duration::ZERO,
            interval: Duration::from_secs(1),
        }
    }

    pub fn failing_on(name: &'static str, call: usize) -> Self {
        Self {
            fail_on: Some(call),
            ..Self::healthy(name)
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl Rule for ScriptedRule {
    async fn check(&mut self) -> Result<(), CheckError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.fail_on == Some(call) {
            return Err(CheckError::Probe {
                rule: self.name.to_string(),
                probe: "scripted".to_string(),
                source: ProbeError::Unavailable(format!("call {call}")),
            });
        }
        Ok(())
    }

    fn check_interval(&self) -> Duration {
        self.interval
    }
}

/// A rule whose check never completes, like a probe stuck on I/O.
pub(crate) struct HangingRule;

#[async_trait]
impl Rule for HangingRule {
    async fn check(&mut self) -> Result<(), CheckError> {
        std::future::pending().await
    }

    fn check_interval(&self) -> Duration {
        Duration::from_secs(1)
    }
}

/// A rule whose check panics, like an adapter with a bug in it.
pub(crate) struct PanickingRule;

#[async_trait]
impl Rule for PanickingRule {
    async fn check(&mut self) -> Result<(), CheckError> {
        panic!("check went wrong")
    }

    fn check_interval(&self) -> Duration {
        Duration::from_secs(1)
    }
}
