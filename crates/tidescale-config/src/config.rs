//! tidescale.toml configuration model.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scalers: BTreeMap<String, ScalerConfig>,
    #[serde(default)]
    pub rules: BTreeMap<String, RuleConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ScalerConfig {
    Mock,
    DockerCompose {
        #[serde(default)]
        service: String,
        #[serde(default)]
        config: Option<PathBuf>,
        /// Replicas running when the daemon starts. Defaults to 1.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        replicas: Option<u32>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleKind {
    #[default]
    Threshold,
    FixedQuadrant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    #[serde(default)]
    pub kind: RuleKind,
    pub scaler: String,
    pub probe: ProbeConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down: Option<String>,
    /// Check interval such as `"5s"`; threshold rules only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ProbeConfig {
    Fixed { value: f64 },
    Command { command: String },
    LoadAverage,
}

impl Config {
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_json_pretty(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SAMPLE: &str = r#"
[scalers.web]
type = "docker-compose"
service = "whoami"
config = "docker-compose.yml"
replicas = 3

[scalers.noop]
type = "mock"

[rules.whoami]
scaler = "web"
refresh = "5s"
up = "> 0.75"
down = "< 0.25"
probe = { type = "command", command = "cat /tmp/load" }

[rules.host]
kind = "fixed-quadrant"
scaler = "noop"
probe = { type = "load-average" }
"#;

    #[test]
    fn parses_all_sections() {
        let config = Config::from_toml_str(SAMPLE).unwrap();

        assert_eq!(
            config.scalers["web"],
            ScalerConfig::DockerCompose {
                service: "whoami".to_string(),
                config: Some(PathBuf::from("docker-compose.yml")),
                replicas: Some(3),
            }
        );
        assert_eq!(config.scalers["noop"], ScalerConfig::Mock);

        let whoami = &config.rules["whoami"];
        assert_eq!(whoami.kind, RuleKind::Threshold);
        assert_eq!(whoami.up.as_deref(), Some("> 0.75"));
        assert_eq!(
            whoami.probe,
            ProbeConfig::Command {
                command: "cat /tmp/load".to_string()
            }
        );

        let host = &config.rules["host"];
        assert_eq!(host.kind, RuleKind::FixedQuadrant);
        assert_eq!(host.probe, ProbeConfig::LoadAverage);
        assert!(host.refresh.is_none());
    }

    #[test]
    fn unknown_scaler_type_is_a_parse_error() {
        let err = Config::from_toml_str("[scalers.x]\ntype = \"badtype\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn reads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.rules.len(), 2);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = Config::from_file(Path::new("/nonexistent/tidescale.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn dumps_as_json() {
        let config = Config::from_toml_str(SAMPLE).unwrap();
        let json = config.to_json_pretty().unwrap();

        assert!(json.contains("\"docker-compose\""));
        assert!(json.contains("\"fixed-quadrant\""));
        assert!(json.contains("cat /tmp/load"));
    }
}
