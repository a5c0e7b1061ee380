//! tidescale-engine — runs rules concurrently.
//!
//! The [`Supervisor`] spawns one watcher task per rule. Each watcher
//! polls its rule on the rule's own interval and reports at most one
//! terminal failure through a shared bounded channel.
//!
//! # Architecture
//!
//! ```text
//! Supervisor
//!   ├── watcher task per rule ──check/sleep loop──▶ Rule::check()
//!   │        └── first error ──▶ failure sink (mpsc, capacity = #rules)
//!   ├── cancellation signal (watch) ──▶ every watcher
//!   └── FailurePolicy decides when to cancel
//! ```
//!
//! No timeout is imposed on checks: a probe stuck on I/O stalls only its
//! own watcher, which still honours cancellation.

pub mod supervisor;
pub mod watcher;

#[cfg(test)]
mod testing;

pub use supervisor::{FailurePolicy, RuleOutcome, Supervisor, SupervisorReport};
pub use watcher::{RuleFailure, WatchOutcome, watch_rule};
