//! The probe contract: a source of one scalar load signal.

use async_trait::async_trait;

use crate::error::ProbeError;

/// Samples a single metric.
///
/// A probe belongs to exactly one rule, so sampling takes `&mut self` and
/// implementations may keep state between reads.
#[async_trait]
pub trait Probe: Send {
    /// Read the current metric value.
    async fn value(&mut self) -> Result<f64, ProbeError>;

    /// Label used in logs.
    fn name(&self) -> &str;
}
