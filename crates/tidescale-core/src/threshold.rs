//! Parametrized threshold rule.
//!
//! Holds an up and a down [`Predicate`] decoded from configuration. Each
//! check reads the probe exactly once and evaluates both predicates
//! against that single reading:
//!
//! ```text
//! v = probe.value()?          // probe failure ends the check with an error
//! up(v) && down(v)  → warn, do nothing
//! up(v)             → scaler.up()    (failure logged, not returned)
//! down(v)           → scaler.down()  (failure logged, not returned)
//! otherwise         → do nothing
//! ```

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::error::{CheckError, RuleError};
use crate::predicate::{Predicate, decode};
use crate::probe::Probe;
use crate::rule::{Decision, Rule, apply, decide, sample};
use crate::scaler::Scaler;

/// A rule driven by configurable up/down predicates.
pub struct ThresholdRule {
    name: String,
    up: Predicate,
    down: Predicate,
    refresh: Duration,
    probe: Box<dyn Probe>,
    scaler: Box<dyn Scaler>,
}

impl ThresholdRule {
    /// Build a rule from already decoded predicates.
    ///
    /// A zero `refresh` is rejected so the watcher always sleeps between checks.
    pub fn new(
        name: impl Into<String>,
        up: Predicate,
        down: Predicate,
        refresh: Duration,
        probe: Box<dyn Probe>,
        scaler: Box<dyn Scaler>,
    ) -> Result<Self, RuleError> {
        let name = name.into();
        if refresh.is_zero() {
            return Err(RuleError::ZeroInterval(name));
        }
        Ok(Self {
            name,
            up,
            down,
            refresh,
            probe,
            scaler,
        })
    }

    /// Build a rule from textual expressions such as `"> 0.75"`.
    pub fn from_expressions(
        name: impl Into<String>,
        up: &str,
        down: &str,
        refresh: Duration,
        probe: Box<dyn Probe>,
        scaler: Box<dyn Scaler>,
    ) -> Result<Self, RuleError> {
        let up = decode(up)?;
        let down = decode(down)?;
        Self::new(name, up, down, refresh, probe, scaler)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn up(&self) -> Predicate {
        self.up
    }

    pub fn down(&self) -> Predicate {
        self.down
    }
}

#[async_trait]
impl Rule for ThresholdRule {
    async fn check(&mut self) -> Result<(), CheckError> {
        let value = sample(&self.name, &mut *self.probe).await?;

        match decide(&self.up, &self.down, value) {
            Decision::Conflict => {
                warn!(
                    rule = %self.name,
                    value,
                    up = %self.up,
                    down = %self.down,
                    "up and down both match, nothing done"
                );
            }
            Decision::Scale(direction) => {
                apply(&self.name, &mut *self.scaler, direction).await;
            }
            Decision::Hold => {}
        }
        Ok(())
    }

    fn check_interval(&self) -> Duration {
        self.refresh
    }
}
