//! Fixed-quadrant rule: scale up above 0.75, down below 0.25.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::CheckError;
use crate::predicate::Predicate;
use crate::probe::Probe;
use crate::rule::{Decision, Rule, apply, decide, sample};
use crate::scaler::Scaler;

/// Upper bound of the hold band.
pub const UP_THRESHOLD: f64 = 0.75;
/// Lower bound of the hold band.
pub const DOWN_THRESHOLD: f64 = 0.25;
/// Interval between two checks.
pub const CHECK_INTERVAL: Duration = Duration::from_secs(3);

const UP: Predicate = Predicate::GreaterThan(UP_THRESHOLD);
const DOWN: Predicate = Predicate::LessThan(DOWN_THRESHOLD);

/// A rule with hard-coded thresholds for probes reporting a 0..1 ratio.
pub struct FixedQuadrantRule {
    name: String,
    probe: Box<dyn Probe>,
    scaler: Box<dyn Scaler>,
}

impl FixedQuadrantRule {
    pub fn new(name: impl Into<String>, probe: Box<dyn Probe>, scaler: Box<dyn Scaler>) -> Self {
        Self {
            name: name.into(),
            probe,
            scaler,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl Rule for FixedQuadrantRule {
    async fn check(&mut self) -> Result<(), CheckError> {
        let value = sample(&self.name, &mut *self.probe).await?;

        if let Decision::Scale(direction) = decide(&UP, &DOWN, value) {
            apply(&self.name, &mut *self.scaler, direction).await;
        }
        Ok(())
    }

    fn check_interval(&self) -> Duration {
        CHECK_INTERVAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingScaler, StaticProbe};

    fn rule_at(value: f64, scaler: &CountingScaler) -> FixedQuadrantRule {
        FixedQuadrantRule::new(
            "quadrant",
            Box::new(StaticProbe::new(value)),
            Box::new(scaler.clone()),
        )
    }

    #[tokio::test]
    async fn high_reading_scales_up_once() {
        let scaler = CountingScaler::default();
        rule_at(0.9, &scaler).check().await.unwrap();

        assert_eq!(scaler.ups(), 1);
        assert_eq!(scaler.downs(), 0);
    }

    #[tokio::test]
    async fn low_reading_scales_down_once() {
        let scaler = CountingScaler::default();
        rule_at(0.1, &scaler).check().await.unwrap();

        assert_eq!(scaler.ups(), 0);
        assert_eq!(scaler.downs(), 1);
    }

    #[tokio::test]
    async fn middle_reading_does_nothing() {
        let scaler = CountingScaler::default();
        rule_at(0.5, &scaler).check().await.unwrap();

        assert_eq!(scaler.ups(), 0);
        assert_eq!(scaler.downs(), 0);
    }

    #[tokio::test]
    async fn thresholds_are_strict() {
        let scaler = CountingScaler::default();
        rule_at(UP_THRESHOLD, &scaler).check().await.unwrap();
        rule_at(DOWN_THRESHOLD, &scaler).check().await.unwrap();

        assert_eq!(scaler.ups(), 0);
        assert_eq!(scaler.downs(), 0);
    }

    #[tokio::test]
    async fn scaler_failure_is_swallowed() {
        let scaler = CountingScaler::failing();
        rule_at(0.9, &scaler).check().await.unwrap();

        assert_eq!(scaler.ups(), 1);
    }

    #[tokio::test]
    async fn probe_failure_is_terminal() {
        let scaler = CountingScaler::default();
        let mut rule = FixedQuadrantRule::new(
            "quadrant",
            Box::new(StaticProbe::failing()),
            Box::new(scaler.clone()),
        );

        let err = rule.check().await.unwrap_err();
        assert!(matches!(err, CheckError::Probe { ref rule, .. } if rule == "quadrant"));
        assert_eq!(scaler.ups() + scaler.downs(), 0);
    }

    #[test]
    fn interval_is_three_seconds() {
        let rule = rule_at(0.5, &CountingScaler::default());
        assert_eq!(rule.check_interval(), Duration::from_secs(3));
    }
}
