//! tidescale-core — the decision side of the autoscaler.
//!
//! Defines the [`Probe`] and [`Scaler`] contracts that concrete adapters
//! implement, the threshold expression decoder, and the two [`Rule`]
//! variants that connect a probe to a scaler.
//!
//! # Architecture
//!
//! ```text
//! Rule (one per configured service)
//!   ├── Probe::value()      → f64 reading
//!   ├── decide(up, down, v) → Scale(Up|Down) | Conflict | Hold
//!   └── Scaler::up()/down() (failures logged, never returned)
//! ```
//!
//! Only a probe failure makes [`Rule::check`] return an error. The engine
//! crate treats that error as terminal for the rule.

pub mod error;
pub mod predicate;
pub mod probe;
pub mod quadrant;
pub mod rule;
pub mod scaler;
pub mod threshold;

#[cfg(test)]
mod testing;

pub use error::{CheckError, DecodeError, ProbeError, RuleError, ScaleError};
pub use predicate::{Predicate, decode};
pub use probe::Probe;
pub use quadrant::FixedQuadrantRule;
pub use rule::{Decision, Direction, Rule, RuleSet, decide};
pub use scaler::Scaler;
pub use threshold::ThresholdRule;
