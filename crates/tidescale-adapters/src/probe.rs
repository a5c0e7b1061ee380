//! Probes: fixed values, shell commands, and the host load average.

use std::path::PathBuf;

use async_trait::async_trait;
use tidescale_core::{Probe, ProbeError};
use tokio::process::Command;
use tracing::debug;

/// Always reports the same value.
#[derive(Debug, Clone)]
pub struct FixedProbe {
    value: f64,
}

impl FixedProbe {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

#[async_trait]
impl Probe for FixedProbe {
    async fn value(&mut self) -> Result<f64, ProbeError> {
        Ok(self.value)
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Runs a shell command and reads a number from its standard output.
#[derive(Debug, Clone)]
pub struct CommandProbe {
    command: String,
    label: String,
}

impl CommandProbe {
    pub fn new(command: impl Into<String>) -> Self {
        let command = command.into();
        let label = format!("command `{command}`");
        Self { command, label }
    }
}

#[async_trait]
impl Probe for CommandProbe {
    async fn value(&mut self) -> Result<f64, ProbeError> {
        let output = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .output()
            .await?;

        if !output.status.success() {
            return Err(ProbeError::Command {
                command: self.command.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!(command = %self.command, stdout = %stdout.trim(), "probe command finished");
        parse_reading(stdout.trim())
    }

    fn name(&self) -> &str {
        &self.label
    }
}

/// One-minute load average divided by the number of CPUs.
///
/// A value of 1.0 means every core is busy on average.
#[derive(Debug, Clone)]
pub struct LoadAverageProbe {
    path: PathBuf,
    cpus: usize,
}

impl LoadAverageProbe {
    /// Read `/proc/loadavg` and normalise by the available parallelism.
    pub fn new() -> Self {
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::with_source("/proc/loadavg", cpus)
    }

    /// Read a loadavg-formatted file with an explicit CPU count.
    pub fn with_source(path: impl Into<PathBuf>, cpus: usize) -> Self {
        Self {
            path: path.into(),
            cpus: cpus.max(1),
        }
    }
}

impl Default for LoadAverageProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Probe for LoadAverageProbe {
    async fn value(&mut self) -> Result<f64, ProbeError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let first = content.split_whitespace().next().unwrap_or_default();
        let load = parse_reading(first)?;
        Ok(load / self.cpus as f64)
    }

    fn name(&self) -> &str {
        "load average"
    }
}

fn parse_reading(raw: &str) -> Result<f64, ProbeError> {
    match raw.parse::<f64>() {
        Ok(v) if !v.is_nan() => Ok(v),
        _ => Err(ProbeError::Parse {
            raw: raw.to_string(),
        }),
    }
}
