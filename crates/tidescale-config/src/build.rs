//! Turning a [`Config`] into a ready-to-run [`RuleSet`].

use std::collections::BTreeMap;
use std::time::Duration;

use tidescale_adapters::{CommandProbe, ComposeScaler, FixedProbe, LoadAverageProbe, MockScaler};
use tidescale_core::{FixedQuadrantRule, Probe, Rule, RuleSet, Scaler, ThresholdRule};
use tracing::{debug, info, warn};

use crate::config::{Config, ProbeConfig, RuleConfig, RuleKind, ScalerConfig};
use crate::error::{ConfigError, ConfigResult};

impl Config {
    /// Build every rule, each wired to its own probe and scaler.
    ///
    /// Fails on the first invalid entry; nothing is started here.
    pub fn build_rules(&self) -> ConfigResult<RuleSet> {
        if self.rules.is_empty() {
            return Err(ConfigError::NoRules);
        }

        let mut owners: BTreeMap<&str, &str> = BTreeMap::new();
        let mut rules = RuleSet::new();

        for (name, rule) in &self.rules {
            let scaler_config =
                self.scalers
                    .get(&rule.scaler)
                    .ok_or_else(|| ConfigError::UnknownScaler {
                        rule: name.clone(),
                        scaler: rule.scaler.clone(),
                    })?;

            if let Some(first) = owners.insert(rule.scaler.as_str(), name.as_str()) {
                return Err(ConfigError::SharedScaler {
                    scaler: rule.scaler.clone(),
                    first: first.to_string(),
                    second: name.clone(),
                });
            }

            let scaler = build_scaler(&rule.scaler, scaler_config)?;
            let probe = build_probe(name, &rule.probe)?;
            rules.insert(name.clone(), build_rule(name, rule, probe, scaler)?);
            info!(rule = %name, scaler = %rule.scaler, kind = ?rule.kind, "rule added");
        }

        for unused in self.scalers.keys().filter(|s| !owners.contains_key(s.as_str())) {
            debug!(scaler = %unused, "scaler not referenced by any rule");
        }

        Ok(rules)
    }

    /// Check the configuration without keeping the built rules.
    pub fn validate(&self) -> ConfigResult<()> {
        self.build_rules().map(|_| ())
    }
}

fn build_scaler(name: &str, config: &ScalerConfig) -> ConfigResult<Box<dyn Scaler>> {
    match config {
        ScalerConfig::Mock => Ok(Box::new(MockScaler)),
        ScalerConfig::DockerCompose {
            service,
            config,
            replicas,
        } => {
            if service.is_empty() {
                return Err(missing_compose_field(name, "service"));
            }
            let file = config
                .as_ref()
                .filter(|p| !p.as_os_str().is_empty())
                .ok_or_else(|| missing_compose_field(name, "config"))?;
            Ok(Box::new(ComposeScaler::new(
                service.clone(),
                file.clone(),
                replicas.unwrap_or(1),
            )))
        }
    }
}

fn missing_compose_field(scaler: &str, field: &'static str) -> ConfigError {
    ConfigError::MissingScalerField {
        scaler: scaler.to_string(),
        kind: "docker-compose",
        field,
    }
}

fn build_probe(rule: &str, config: &ProbeConfig) -> ConfigResult<Box<dyn Probe>> {
    let probe: Box<dyn Probe> = match config {
        ProbeConfig::Fixed { value } if value.is_nan() => {
            return Err(ConfigError::NanProbeValue {
                rule: rule.to_string(),
            });
        }
        ProbeConfig::Fixed { value } => Box::new(FixedProbe::new(*value)),
        ProbeConfig::Command { command } => Box::new(CommandProbe::new(command.clone())),
        ProbeConfig::LoadAverage => Box::new(LoadAverageProbe::new()),
    };
    Ok(probe)
}

fn build_rule(
    name: &str,
    config: &RuleConfig,
    probe: Box<dyn Probe>,
    scaler: Box<dyn Scaler>,
) -> ConfigResult<Box<dyn Rule>> {
    match config.kind {
        RuleKind::FixedQuadrant => {
            if config.up.is_some() || config.down.is_some() || config.refresh.is_some() {
                warn!(rule = %name, "up, down and refresh are ignored by fixed-quadrant rules");
            }
            Ok(Box::new(FixedQuadrantRule::new(name, probe, scaler)))
        }
        RuleKind::Threshold => {
            let up = required(name, "up", &config.up)?;
            let down = required(name, "down", &config.down)?;
            let refresh = required(name, "refresh", &config.refresh)?;
            let interval = parse_duration(refresh).ok_or_else(|| ConfigError::InvalidDuration {
                rule: name.to_string(),
                value: refresh.to_string(),
            })?;

            let rule = ThresholdRule::from_expressions(name, up, down, interval, probe, scaler)
                .map_err(|source| ConfigError::Rule {
                    rule: name.to_string(),
                    source,
                })?;
            Ok(Box::new(rule))
        }
    }
}

fn required<'a>(
    rule: &str,
    field: &'static str,
    value: &'a Option<String>,
) -> ConfigResult<&'a str> {
    value.as_deref().ok_or_else(|| ConfigError::MissingRuleField {
        rule: rule.to_string(),
        field,
    })
}

/// Parse a duration string like "500ms", "5s", "2m", or "1h".
/// A bare number is read as seconds.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(ms) = s.strip_suffix("ms") {
        ms.trim().parse().ok().map(Duration::from_millis)
    } else if let Some(secs) = s.strip_suffix('s') {
        secs.trim().parse().ok().map(Duration::from_secs)
    } else if let Some(mins) = s.strip_suffix('m') {
        scaled_secs(mins, 60)
    } else if let Some(hours) = s.strip_suffix('h') {
        scaled_secs(hours, 3600)
    } else {
        s.parse().ok().map(Duration::from_secs)
    }
}

fn scaled_secs(count: &str, unit: u64) -> Option<Duration> {
    let count: u64 = count.trim().parse().ok()?;
    count.checked_mul(unit).map(Duration::from_secs)
}
