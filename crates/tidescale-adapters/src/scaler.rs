//! Scalers: a log-only mock and the docker-compose replica scaler.

use std::path::PathBuf;

use async_trait::async_trait;
use tidescale_core::{ScaleError, Scaler};
use tokio::process::Command;
use tracing::{debug, info};

/// Logs scale actions and never fails.
#[derive(Debug, Clone, Default)]
pub struct MockScaler;

#[async_trait]
impl Scaler for MockScaler {
    async fn up(&mut self) -> Result<(), ScaleError> {
        info!("SCALE UP");
        Ok(())
    }

    async fn down(&mut self) -> Result<(), ScaleError> {
        info!("SCALE DOWN");
        Ok(())
    }

    fn describe(&self) -> &str {
        "mock scaler writing to the log"
    }
}

/// Scales a compose service with `docker-compose -f <file> scale <svc>=<n>`.
///
/// The replica count is tracked locally, starting from the configured
/// value, and only changes once the command succeeds. The service is never
/// scaled below one replica.
#[derive(Debug, Clone)]
pub struct ComposeScaler {
    service: String,
    config_file: PathBuf,
    replicas: u32,
    program: String,
    label: String,
}

impl ComposeScaler {
    pub fn new(service: impl Into<String>, config_file: impl Into<PathBuf>, replicas: u32) -> Self {
        let service = service.into();
        let label = format!("docker-compose service {service}");
        Self {
            service,
            config_file: config_file.into(),
            replicas: replicas.max(1),
            program: "docker-compose".to_string(),
            label,
        }
    }

    /// Use another executable in place of `docker-compose`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn replicas(&self) -> u32 {
        self.replicas
    }

    async fn scale_to(&mut self, target: u32) -> Result<(), ScaleError> {
        let assignment = format!("{}={target}", self.service);
        info!(service = %self.service, from = self.replicas, to = target, "scaling service");

        let output = Command::new(&self.program)
            .arg("-f")
            .arg(&self.config_file)
            .arg("scale")
            .arg(&assignment)
            .output()
            .await?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(ScaleError::Command {
                command: format!(
                    "{} -f {} scale {assignment}",
                    self.program,
                    self.config_file.display()
                ),
                status: output.status.to_string(),
                output: combined.trim().to_string(),
            });
        }

        self.replicas = target;
        Ok(())
    }
}

#[async_trait]
impl Scaler for ComposeScaler {
    async fn up(&mut self) -> Result<(), ScaleError> {
        let target = self.replicas.checked_add(1).ok_or_else(|| {
            ScaleError::Rejected(format!("{} is already at {} replicas", self.label, self.replicas))
        })?;
        self.scale_to(target).await
    }

    async fn down(&mut self) -> Result<(), ScaleError> {
        if self.replicas < 2 {
            debug!(service = %self.service, "cannot scale down below one replica");
            return Ok(());
        }
        self.scale_to(self.replicas - 1).await
    }

    fn describe(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_scaler_always_succeeds() {
        let mut scaler = MockScaler;
        assert!(scaler.up().await.is_ok());
        assert!(scaler.down().await.is_ok());
    }

    #[tokio::test]
    async fn compose_tracks_replicas_on_success() {
        let mut scaler = ComposeScaler::new("whoami", "compose.yml", 3).with_program("true");

        scaler.up().await.unwrap();
        assert_eq!(scaler.replicas(), 4);

        scaler.down().await.unwrap();
        scaler.down().await.unwrap();
        assert_eq!(scaler.replicas(), 2);
    }

    #[tokio::test]
    async fn compose_never_goes_below_one_replica() {
        // `false` would fail if it were ever invoked.
        let mut scaler = ComposeScaler::new("whoami", "compose.yml", 1).with_program("false");

        scaler.down().await.unwrap();
        assert_eq!(scaler.replicas(), 1);
    }

    #[tokio::test]
    async fn compose_failure_keeps_replica_count() {
        let mut scaler = ComposeScaler::new("whoami", "compose.yml", 2).with_program("false");

        let err = scaler.up().await.unwrap_err();
        assert!(matches!(err, ScaleError::Command { ref command, .. }
            if command == "false -f compose.yml scale whoami=3"));
        assert_eq!(scaler.replicas(), 2);
    }

    #[tokio::test]
    async fn compose_refuses_to_scale_past_max_replicas() {
        // `false` would fail if it were ever invoked.
        let mut scaler = ComposeScaler::new("whoami", "compose.yml", u32::MAX).with_program("false");

        assert!(matches!(scaler.up().await, Err(ScaleError::Rejected(_))));
        assert_eq!(scaler.replicas(), u32::MAX);
    }

    #[tokio::test]
    async fn missing_program_is_an_io_error() {
        let mut scaler = ComposeScaler::new("whoami", "compose.yml", 2)
            .with_program("/nonexistent/docker-compose");

        assert!(matches!(scaler.up().await, Err(ScaleError::Io(_))));
    }

    #[test]
    fn zero_initial_replicas_is_clamped() {
        let scaler = ComposeScaler::new("whoami", "compose.yml", 0);
        assert_eq!(scaler.replicas(), 1);
        assert_eq!(scaler.describe(), "docker-compose service whoami");
    }
}
