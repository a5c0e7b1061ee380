//! Configuration errors. All of them are raised before any rule runs.

use std::path::PathBuf;

use thiserror::Error;
use tidescale_core::RuleError;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot encode config: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("no rules configured")]
    NoRules,

    #[error("no {field} specified for {kind} scaler [{scaler}]")]
    MissingScalerField {
        scaler: String,
        kind: &'static str,
        field: &'static str,
    },

    #[error("rule [{rule}] references unknown scaler [{scaler}]")]
    UnknownScaler { rule: String, scaler: String },

    #[error("scaler [{scaler}] is used by both rule [{first}] and rule [{second}]")]
    SharedScaler {
        scaler: String,
        first: String,
        second: String,
    },

    #[error("rule [{rule}]: missing `{field}`")]
    MissingRuleField { rule: String, field: &'static str },

    #[error("rule [{rule}]: fixed probe value is not a number")]
    NanProbeValue { rule: String },

    #[error("rule [{rule}]: invalid duration {value:?}")]
    InvalidDuration { rule: String, value: String },

    #[error("rule [{rule}]: {source}")]
    Rule {
        rule: String,
        #[source]
        source: RuleError,
    },
}
