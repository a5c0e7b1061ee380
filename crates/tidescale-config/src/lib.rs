//! tidescale-config — `tidescale.toml` parsing and rule assembly.
//!
//! ```toml
//! [scalers.web]
//! type = "docker-compose"
//! service = "whoami"
//! config = "docker-compose.yml"
//!
//! [rules.whoami]
//! scaler = "web"
//! refresh = "5s"
//! up = "> 0.75"
//! down = "< 0.25"
//! probe = { type = "command", command = "cat /tmp/load" }
//! ```
//!
//! Every check happens in [`Config::build_rules`], before any rule runs.
//! Each rule gets its own probe and scaler instance; a scaler entry may be
//! referenced by one rule only.

pub mod build;
pub mod config;
pub mod error;

pub use build::parse_duration;
pub use config::{Config, ProbeConfig, RuleConfig, RuleKind, ScalerConfig};
pub use error::{ConfigError, ConfigResult};
