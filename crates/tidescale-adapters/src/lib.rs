//! tidescale-adapters — concrete [`Probe`](tidescale_core::Probe) and
//! [`Scaler`](tidescale_core::Scaler) implementations.
//!
//! | adapter | kind | source / actuator |
//! |---|---|---|
//! | [`FixedProbe`] | probe | constant value |
//! | [`CommandProbe`] | probe | `sh -c <command>` stdout |
//! | [`LoadAverageProbe`] | probe | `/proc/loadavg` per CPU |
//! | [`MockScaler`] | scaler | log only |
//! | [`ComposeScaler`] | scaler | `docker-compose scale` |

pub mod probe;
pub mod scaler;

pub use probe::{CommandProbe, FixedProbe, LoadAverageProbe};
pub use scaler::{ComposeScaler, MockScaler};
