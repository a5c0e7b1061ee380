//! The rule contract and the decision logic shared by rule variants.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::CheckError;
use crate::predicate::Predicate;
use crate::probe::Probe;
use crate::scaler::Scaler;

/// A scaling policy binding one probe to one scaler.
///
/// Each rule is driven by exactly one watcher task, which holds it by
/// value; `check` therefore never runs concurrently for the same rule.
#[async_trait]
pub trait Rule: Send {
    /// Sample the probe and act on the scaler if needed.
    ///
    /// Only terminal failures are returned. Scale action failures are
    /// logged and swallowed.
    async fn check(&mut self) -> Result<(), CheckError>;

    /// Time to wait between two checks. Fixed for the rule's lifetime.
    fn check_interval(&self) -> Duration;
}

/// All rules of a running engine, keyed by rule name.
pub type RuleSet = BTreeMap<String, Box<dyn Rule>>;

/// Direction of a scale action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

/// Outcome of evaluating the up and down predicates against one reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Scale(Direction),
    /// Both predicates matched; nothing is done.
    Conflict,
    Hold,
}

/// Evaluate both predicates once against a single reading.
pub fn decide(up: &Predicate, down: &Predicate, value: f64) -> Decision {
    match (up.eval(value), down.eval(value)) {
        (true, true) => Decision::Conflict,
        (true, false) => Decision::Scale(Direction::Up),
        (false, true) => Decision::Scale(Direction::Down),
        (false, false) => Decision::Hold,
    }
}

/// Read the probe once. A failed read is the rule's terminal error.
pub(crate) async fn sample(rule: &str, probe: &mut dyn Probe) -> Result<f64, CheckError> {
    let value = probe.value().await.map_err(|source| CheckError::Probe {
        rule: rule.to_string(),
        probe: probe.name().to_string(),
        source,
    })?;
    debug!(rule, probe = probe.name(), value, "probe sampled");
    Ok(value)
}

/// Run a scale action, logging the result. Failures never leave this
/// function; the rule simply tries again on its next check.
pub(crate) async fn apply(rule: &str, scaler: &mut dyn Scaler, direction: Direction) {
    let result = match direction {
        Direction::Up => scaler.up().await,
        Direction::Down => scaler.down().await,
    };

    match result {
        Ok(()) => info!(rule, scaler = scaler.describe(), %direction, "scaled"),
        Err(e) => warn!(
            rule,
            scaler = scaler.describe(),
            %direction,
            error = %e,
            "scaling action failed"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decide_covers_all_quadrants() {
        let up = Predicate::GreaterThan(0.75);
        let down = Predicate::LessThan(0.25);

        assert_eq!(decide(&up, &down, 0.9), Decision::Scale(Direction::Up));
        assert_eq!(decide(&up, &down, 0.1), Decision::Scale(Direction::Down));
        assert_eq!(decide(&up, &down, 0.5), Decision::Hold);
    }

    #[test]
    fn overlapping_predicates_conflict() {
        let up = Predicate::GreaterThan(0.2);
        let down = Predicate::LessThan(0.8);

        assert_eq!(decide(&up, &down, 0.5), Decision::Conflict);
        assert_eq!(decide(&up, &down, 0.9), Decision::Scale(Direction::Up));
    }

    #[test]
    fn never_predicate_holds() {
        assert_eq!(
            decide(&Predicate::Never, &Predicate::Never, 1.0),
            Decision::Hold
        );
    }
}
