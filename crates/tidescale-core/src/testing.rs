//! Probe and scaler doubles for rule tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{ProbeError, ScaleError};
use crate::probe::Probe;
use crate::scaler::Scaler;

/// Returns a constant reading, or fails every read when `value` is `None`.
pub(crate) struct StaticProbe {
    pub value: Option<f64>,
    pub reads: Arc<AtomicUsize>,
}

impl StaticProbe {
    pub fn new(value: f64) -> Self {
        Self {
            value: Some(value),
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            value: None,
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl Probe for StaticProbe {
    async fn value(&mut self) -> Result<f64, ProbeError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.value
            .ok_or_else(|| ProbeError::Unavailable("no reading".to_string()))
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Counts scale calls; optionally fails every call.
#[derive(Clone, Default)]
pub(crate) struct CountingScaler {
    pub ups: Arc<AtomicUsize>,
    pub downs: Arc<AtomicUsize>,
    pub fail: bool,
}

impl CountingScaler {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn ups(&self) -> usize {
        self.ups.load(Ordering::SeqCst)
    }

    pub fn downs(&self) -> usize {
        self.downs.load(Ordering::SeqCst)
    }

    fn outcome(&self) -> Result<(), ScaleError> {
        if self.fail {
            Err(ScaleError::Rejected("refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Scaler for CountingScaler {
    async fn up(&mut self) -> Result<(), ScaleError> {
        self.ups.fetch_add(1, Ordering::SeqCst);
        self.outcome()
    }

    async fn down(&mut self) -> Result<(), ScaleError> {
        self.downs.fetch_add(1, Ordering::SeqCst);
        self.outcome()
    }

    fn describe(&self) -> &str {
        "counting"
    }
}
