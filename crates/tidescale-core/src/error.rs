//! Error types for probes, scalers, and rules.

use thiserror::Error;

/// A threshold expression could not be decoded into a [`Predicate`](crate::Predicate).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("error decoding rule [{0}]: expected `<op> <number>` with op one of > < == !=")]
    Syntax(String),

    #[error("error decoding rule [{expr}]: invalid threshold {literal:?}")]
    Number { expr: String, literal: String },
}

/// Failure reading a metric from a probe.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("command `{command}` exited with {status}: {stderr}")]
    Command {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("cannot parse {raw:?} as a metric value")]
    Parse { raw: String },

    #[error("probe unavailable: {0}")]
    Unavailable(String),
}

/// Failure performing a scale action.
#[derive(Debug, Error)]
pub enum ScaleError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("command `{command}` exited with {status}: {output}")]
    Command {
        command: String,
        status: String,
        output: String,
    },

    #[error("scaler rejected action: {0}")]
    Rejected(String),
}

/// Terminal failure of a rule check. Reaching the supervisor with one of
/// these stops the rule's watcher.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("rule [{rule}]: probe {probe} failed: {source}")]
    Probe {
        rule: String,
        probe: String,
        #[source]
        source: ProbeError,
    },
}

/// Invalid rule construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("rule [{0}]: check interval must be greater than zero")]
    ZeroInterval(String),
}
