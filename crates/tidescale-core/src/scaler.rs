//! The scaler contract: an actuator that grows or shrinks a service.

use async_trait::async_trait;

use crate::error::ScaleError;

/// Changes the capacity of one managed service.
///
/// Like probes, scalers are owned by a single rule and may track state
/// (e.g. the current replica count) across calls.
#[async_trait]
pub trait Scaler: Send {
    /// Add capacity.
    async fn up(&mut self) -> Result<(), ScaleError>;

    /// Remove capacity.
    async fn down(&mut self) -> Result<(), ScaleError>;

    /// Label used in logs.
    fn describe(&self) -> &str;
}
